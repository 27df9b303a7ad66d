//! Database connection pool lifecycle
//!
//! The pool is shared by every request handler through the engine and store
//! handles built from it, but only [`ConnectionPool::close`] ends it.

use crate::config::DatabaseConfig;
use crate::error::ConnectionError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How long [`ConnectionPool::close`] waits for connections to shut down
pub const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Owner of the server's PostgreSQL pool
#[derive(Debug)]
pub struct ConnectionPool {
    pool: PgPool,
    closed: AtomicBool,
}

impl ConnectionPool {
    /// Establish a pool, failing if no connection can be opened
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ConnectionError> {
        tracing::info!(url = %config.redacted_url(), "Connecting to database");

        let pool = Self::options(config)
            .connect(&config.connection_url())
            .await
            .map_err(|source| ConnectionError {
                url: config.redacted_url(),
                source,
            })?;

        tracing::info!("Database connection established");
        Ok(Self::from_pool(pool))
    }

    /// Build a pool that opens connections on first use
    ///
    /// Must be called from within a Tokio runtime.
    pub fn lazy(config: &DatabaseConfig) -> Result<Self, ConnectionError> {
        let pool = Self::options(config)
            .connect_lazy(&config.connection_url())
            .map_err(|source| ConnectionError {
                url: config.redacted_url(),
                source,
            })?;

        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            closed: AtomicBool::new(false),
        }
    }

    fn options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
    }

    /// Shared pool handle for the store and engine
    pub fn pg_pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the pool; only the first call has any effect
    ///
    /// The pool is marked closed immediately, so further acquires fail.
    /// Idle connections get [`CLOSE_GRACE`] to shut down cleanly. Connections
    /// still checked out are not waited for; each one is closed when its
    /// holder returns it.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        tracing::info!("Closing database pool");
        if tokio::time::timeout(CLOSE_GRACE, self.pool.close())
            .await
            .is_err()
        {
            tracing::warn!(
                in_use = (self.pool.size() as usize).saturating_sub(self.pool.num_idle()),
                "Database pool closed with connections still in use"
            );
        }
    }
}
