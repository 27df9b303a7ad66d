mod common;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use floxy_engine::{AuthError, AuthResolver};
use floxy_ui::{AssemblyOptions, EngineMode};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

use common::{lazy_server, static_dir, test_config, BUNDLE_JS, BUNDLE_LICENSE, INDEX_HTML};

async fn get(app: &Router, method: &str, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

fn full_options() -> AssemblyOptions {
    AssemblyOptions::from_config(&floxy_ui::Config::default())
}

#[tokio::test]
async fn root_serves_entry_document() {
    let dir = static_dir();
    let server = lazy_server(test_config(dir.path(), EngineMode::Full), full_options());
    let app = server.router();

    let (status, headers, body) = get(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML.as_bytes());
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}

#[tokio::test]
async fn deep_links_serve_entry_document() {
    let dir = static_dir();
    let server = lazy_server(test_config(dir.path(), EngineMode::Full), full_options());
    let app = server.router();

    for path in [
        "/a/b/c",
        "/workflows",
        "/workflows/",
        "/instances/42/steps",
        "/index.html",
        "/bundle.js/",
        "/static/bundle.js",
        "/dlq?page=2",
    ] {
        let (status, _, body) = get(&app, "GET", path).await;
        assert_eq!(status, StatusCode::OK, "path {}", path);
        assert_eq!(body, INDEX_HTML.as_bytes(), "path {}", path);
    }
}

#[tokio::test]
async fn bundle_is_served_from_disk() {
    let dir = static_dir();
    let server = lazy_server(test_config(dir.path(), EngineMode::Full), full_options());
    let app = server.router();

    let (status, headers, body) = get(&app, "GET", "/bundle.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, BUNDLE_JS.as_bytes());
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .contains("javascript"));

    let (status, headers, body) = get(&app, "GET", "/bundle.js.LICENSE.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, BUNDLE_LICENSE.as_bytes());
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn entry_document_is_reread_per_request() {
    let dir = static_dir();
    let server = lazy_server(test_config(dir.path(), EngineMode::Full), full_options());
    let app = server.router();

    std::fs::write(dir.path().join("index.html"), "<html>rebuilt</html>").unwrap();

    let (status, _, body) = get(&app, "GET", "/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>rebuilt</html>");
}

#[tokio::test]
async fn api_routes_take_precedence_over_fallback() {
    let dir = static_dir();
    let server = lazy_server(test_config(dir.path(), EngineMode::Full), full_options());
    let app = server.router();

    let (status, headers, body) = get(&app, "GET", "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["mode"], "full");
}

struct CountingDenier(AtomicUsize);

impl AuthResolver for CountingDenier {
    fn resolve(&self, _headers: &HeaderMap) -> Result<String, AuthError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Err(AuthError("no identity".to_string()))
    }
}

#[tokio::test]
async fn plugins_consult_injected_resolver() {
    let dir = static_dir();
    let resolver = Arc::new(CountingDenier(AtomicUsize::new(0)));
    let options = full_options().with_resolver(resolver.clone());
    let server = lazy_server(test_config(dir.path(), EngineMode::Full), options);
    let app = server.router();

    for path in [
        "/api/instances/7/cancel",
        "/api/instances/7/abort",
        "/api/instances/7/make-decision/confirm",
    ] {
        let (status, _, _) = get(&app, "POST", path).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "path {}", path);
    }

    assert_eq!(resolver.0.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn minimal_mode_leaves_plugin_paths_to_fallback() {
    let dir = static_dir();
    let config = test_config(dir.path(), EngineMode::Minimal);
    let options = AssemblyOptions::from_config(&config);
    let server = lazy_server(config, options);
    assert!(server.assembly().engine().is_none());
    let app = server.router();

    let (status, _, body) = get(&app, "POST", "/api/instances/7/cancel").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML.as_bytes());

    let (status, _, body) = get(&app, "GET", "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["mode"], "minimal");
}
