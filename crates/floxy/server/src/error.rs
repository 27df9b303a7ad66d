//! Error types for floxy-ui

use thiserror::Error;

/// Database pool could not be established
#[derive(Debug, Error)]
#[error("Failed to connect to database at {url}: {source}")]
pub struct ConnectionError {
    /// Connection URL with the password masked
    pub url: String,
    #[source]
    pub source: sqlx::Error,
}

/// Listener failure after startup
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server-level errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Serve(#[from] ServeError),
}

/// Result type alias for server operations
pub type ServerResult<T> = Result<T, ServerError>;
