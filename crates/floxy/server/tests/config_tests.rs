//! `Config::load` against the real process environment.
//!
//! Kept in one test so no other test in this binary sees the variables.

#![cfg(unix)]

use floxy_ui::config::{DEFAULT_DB_HOST, DEFAULT_DB_PASSWORD};
use floxy_ui::{Config, EngineMode};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

#[test]
fn load_tolerates_non_utf8_environment() {
    let invalid = OsStr::from_bytes(b"f\xffo");

    std::env::set_var("PORT", "4000");
    std::env::set_var("ENGINE_MODE", "minimal");
    std::env::set_var("DB_HOST", "");
    std::env::set_var("DB_PASSWORD", invalid);
    std::env::set_var("FLOXY_UNRELATED_SETTING", invalid);
    std::env::set_var(OsStr::from_bytes(b"FLOXY_\xffKEY"), "value");

    let config = Config::load();

    assert_eq!(config.port, 4000);
    assert_eq!(config.engine_mode, EngineMode::Minimal);
    assert_eq!(config.database.host, DEFAULT_DB_HOST);
    assert_eq!(config.database.password, DEFAULT_DB_PASSWORD);
}
