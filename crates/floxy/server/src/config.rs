//! Configuration for floxy-ui
//!
//! Every setting comes from an environment variable and has a default.
//! Loading never fails: unset, empty or unparsable values fall back to the
//! default for that field.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5435;
pub const DEFAULT_DB_NAME: &str = "floxy";
pub const DEFAULT_DB_USER: &str = "floxy";
pub const DEFAULT_DB_PASSWORD: &str = "password";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_STATIC_DIR: &str = "./web/dist";
pub const DEFAULT_ACTOR_ID: &str = "admin";

/// Environment variables read by [`Config::load`]
pub const ENV_KEYS: [&str; 11] = [
    "PORT",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "DB_USER",
    "DB_PASSWORD",
    "DB_MAX_CONNECTIONS",
    "DB_CONNECT_TIMEOUT_SECS",
    "STATIC_DIR",
    "ENGINE_MODE",
    "ACTOR_ID",
];

/// Main server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Listener port
    pub port: u16,

    /// Database connection settings
    pub database: DatabaseConfig,

    /// Directory holding the built UI (`index.html`, `bundle.js`, ...)
    pub static_dir: PathBuf,

    /// Engine wiring
    pub engine_mode: EngineMode,

    /// Identity attributed to plugin actions
    pub actor_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database: DatabaseConfig::default(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            engine_mode: EngineMode::default(),
            actor_id: DEFAULT_ACTOR_ID.to_string(),
        }
    }
}

/// Database configuration
#[derive(Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,

    /// Maximum connections in pool
    pub max_connections: u32,

    /// Connection / acquire timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            name: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_DB_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl DatabaseConfig {
    /// PostgreSQL connection URL for this database
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    /// Same URL with the password masked, for logs
    pub fn redacted_url(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.name
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// How the workflow engine is wired into the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineMode {
    /// Live engine with the decision, cancel and abort plugins
    #[default]
    Full,

    /// Store-backed read API only; no engine, no plugins
    Minimal,
}

impl FromStr for EngineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(EngineMode::Full),
            "minimal" => Ok(EngineMode::Minimal),
            other => Err(format!("unknown engine mode: {}", other)),
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineMode::Full => f.write_str("full"),
            EngineMode::Minimal => f.write_str("minimal"),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Only [`ENV_KEYS`] are read. A value that is not valid UTF-8 counts as
    /// unset.
    pub fn load() -> Self {
        let vars = ENV_KEYS
            .iter()
            .filter_map(|key| match std::env::var_os(key)?.into_string() {
                Ok(value) => Some((key.to_string(), value)),
                Err(_) => {
                    tracing::warn!(key, "Ignoring non UTF-8 value, using default");
                    None
                }
            })
            .collect();

        Self::load_from(vars)
    }

    /// Load configuration from an explicit set of variables
    pub fn load_from(vars: HashMap<String, String>) -> Self {
        Self::from_source(config::Environment::default().source(Some(vars)))
    }

    fn from_source(env: config::Environment) -> Self {
        let source = match config::Config::builder().add_source(env).build() {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(error = %e, "Unable to read environment, using defaults");
                config::Config::default()
            }
        };
        let vars = Vars(&source);

        Self {
            port: vars.parsed("PORT", DEFAULT_PORT, |port| *port > 0),
            database: DatabaseConfig {
                host: vars.string("DB_HOST", DEFAULT_DB_HOST),
                port: vars.parsed("DB_PORT", DEFAULT_DB_PORT, |port| *port > 0),
                name: vars.string("DB_NAME", DEFAULT_DB_NAME),
                user: vars.string("DB_USER", DEFAULT_DB_USER),
                password: vars.string("DB_PASSWORD", DEFAULT_DB_PASSWORD),
                max_connections: vars.parsed("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS, |n| {
                    *n > 0
                }),
                connect_timeout_secs: vars.parsed(
                    "DB_CONNECT_TIMEOUT_SECS",
                    DEFAULT_DB_CONNECT_TIMEOUT_SECS,
                    |secs| *secs > 0,
                ),
            },
            static_dir: PathBuf::from(vars.string("STATIC_DIR", DEFAULT_STATIC_DIR)),
            engine_mode: vars.parsed("ENGINE_MODE", EngineMode::default(), |_| true),
            actor_id: vars.string("ACTOR_ID", DEFAULT_ACTOR_ID),
        }
    }
}

// Environment keys are stored lowercased by the `config` crate.
struct Vars<'a>(&'a config::Config);

impl Vars<'_> {
    fn raw(&self, key: &str) -> Option<String> {
        self.0
            .get_string(&key.to_lowercase())
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T, F>(&self, key: &str, default: T, valid: F) -> T
    where
        T: FromStr,
        F: Fn(&T) -> bool,
    {
        let Some(value) = self.raw(key) else {
            return default;
        };

        match value.trim().parse::<T>() {
            Ok(parsed) if valid(&parsed) => parsed,
            _ => {
                tracing::debug!(key, value = %value, "Ignoring invalid value, using default");
                default
            }
        }
    }
}
