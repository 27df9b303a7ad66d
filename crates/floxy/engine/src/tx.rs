//! Transaction boundary over the shared pool

use crate::error::EngineResult;
use sqlx::{PgPool, Postgres, Transaction};

/// Hands out transactions on the pool the store reads from
#[derive(Debug, Clone)]
pub struct TxManager {
    pool: PgPool,
}

impl TxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction; dropping it without commit rolls back
    pub async fn begin(&self) -> EngineResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}
