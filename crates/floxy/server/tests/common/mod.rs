//! Shared fixtures for integration tests

#![allow(dead_code)]

use floxy_ui::{AssemblyOptions, Config, ConnectionPool, DatabaseConfig, EngineMode, Server};
use std::path::Path;
use tempfile::TempDir;

pub const INDEX_HTML: &str =
    "<!doctype html><html><head><title>Floxy</title></head><body><div id=\"root\"></div><script src=\"/bundle.js\"></script></body></html>";
pub const BUNDLE_JS: &str = "console.log(\"floxy bundle\");";
pub const BUNDLE_LICENSE: &str = "MIT License";

/// A static directory laid out like the built UI
pub fn static_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_ui(dir.path());
    dir
}

pub fn write_ui(path: &Path) {
    std::fs::write(path.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(path.join("bundle.js"), BUNDLE_JS).unwrap();
    std::fs::write(path.join("bundle.js.LICENSE.txt"), BUNDLE_LICENSE).unwrap();
}

/// Configuration pointing at `static_dir` and a database nobody listens on
pub fn test_config(static_dir: &Path, mode: EngineMode) -> Config {
    let mut config = Config::default();
    config.static_dir = static_dir.to_path_buf();
    config.engine_mode = mode;
    config.database.host = "127.0.0.1".to_string();
    config.database.port = 1;
    config.database.connect_timeout_secs = 1;
    config
}

/// Server on a lazy pool; requests that reach the database will fail
pub fn lazy_server(config: Config, options: AssemblyOptions) -> Server {
    let pool = ConnectionPool::lazy(&config.database).unwrap();
    Server::from_pool(config, pool, options)
}

pub const TEST_DB_HOST: &str = "FLOXY_TEST_DB_HOST";

/// Database named by `FLOXY_TEST_DB_*`, or `None` when no host is set
pub fn test_database() -> Option<DatabaseConfig> {
    let mut db = DatabaseConfig {
        host: std::env::var(TEST_DB_HOST).ok()?,
        ..DatabaseConfig::default()
    };
    if let Some(port) = std::env::var("FLOXY_TEST_DB_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
    {
        db.port = port;
    }
    if let Ok(name) = std::env::var("FLOXY_TEST_DB_NAME") {
        db.name = name;
    }
    if let Ok(user) = std::env::var("FLOXY_TEST_DB_USER") {
        db.user = user;
    }
    if let Ok(password) = std::env::var("FLOXY_TEST_DB_PASSWORD") {
        db.password = password;
    }
    Some(db)
}
