//! Server construction

use crate::assembly::{Assembly, AssemblyOptions, EngineAssembly};
use crate::config::Config;
use crate::error::ServerResult;
use crate::pool::ConnectionPool;
use crate::router;
use axum::Router;

/// Floxy UI server
///
/// Sole owner of the configuration, the connection pool and the assembled
/// engine for the lifetime of the process.
pub struct Server {
    config: Config,
    pool: ConnectionPool,
    assembly: Assembly,
}

impl Server {
    /// Connect to the database and assemble the engine from `config`
    pub async fn new(config: Config) -> ServerResult<Self> {
        let options = AssemblyOptions::from_config(&config);
        Self::with_options(config, options).await
    }

    /// Like [`Server::new`] with explicit assembly options
    pub async fn with_options(config: Config, options: AssemblyOptions) -> ServerResult<Self> {
        let pool = ConnectionPool::connect(&config.database).await?;
        Ok(Self::from_pool(config, pool, options))
    }

    /// Assemble on an already established pool
    pub fn from_pool(config: Config, pool: ConnectionPool, options: AssemblyOptions) -> Self {
        let assembly = EngineAssembly::assemble(pool.pg_pool(), &options);
        Self {
            config,
            pool,
            assembly,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    /// Full request router: API, static assets and UI fallback
    pub fn router(&self) -> Router {
        router::compose(self.assembly.router(), &self.config.static_dir)
    }

    /// Release the connection pool; safe to call any number of times
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
