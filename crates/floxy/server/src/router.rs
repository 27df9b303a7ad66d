//! Request routing for the single-page UI
//!
//! Route precedence:
//! 1. API routes registered by the engine and its plugins (all under `/api/`)
//! 2. the bundle and its license file, matched exactly and read from disk
//! 3. everything else receives the UI entry document with status 200, so
//!    client-side routes survive deep links and reloads

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

/// Static files served at the exact path of the same name
pub const STATIC_ASSETS: [&str; 2] = ["/bundle.js", "/bundle.js.LICENSE.txt"];

/// UI entry document inside the static directory
pub const ENTRY_DOCUMENT: &str = "index.html";

/// Mount the static assets and the UI fallback onto the API mux
pub fn compose(api: Router, static_dir: &Path) -> Router {
    let mut router = api;

    for asset in STATIC_ASSETS {
        let file = static_dir.join(asset.trim_start_matches('/'));
        router = router.route_service(asset, ServeFile::new(file));
    }

    let entry = Arc::new(static_dir.join(ENTRY_DOCUMENT));
    router
        .fallback(move || serve_entry_document(entry.clone()))
        .layer(TraceLayer::new_for_http())
}

async fn serve_entry_document(path: Arc<PathBuf>) -> Response {
    match tokio::fs::read(path.as_path()).await {
        Ok(bytes) => Html(bytes).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "UI entry document unavailable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
