//! Floxy workflow engine surface used by the UI server.
//!
//! This crate provides the pieces the server assembles around one shared
//! PostgreSQL pool:
//! - [`Store`]: read access to workflow definitions, instances, steps, events and stats
//! - [`TxManager`]: transaction boundary over the pool
//! - [`Engine`]: instance control operations (cancel, abort, human decisions)
//! - [`ApiServer`]: the HTTP route mux, extended by [`Plugin`]s
//!
//! Plugins attribute every action to an actor obtained from an injected
//! [`AuthResolver`].

pub mod api;
pub mod engine;
pub mod error;
pub mod model;
pub mod plugin;
pub mod plugins;
pub mod store;
pub mod tx;

pub use api::ApiServer;
pub use engine::{Decision, Engine};
pub use error::{ApiError, ApiResult, AuthError, EngineError, EngineResult};
pub use plugin::{AuthResolver, Plugin};
pub use store::Store;
pub use tx::TxManager;
