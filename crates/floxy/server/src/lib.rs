//! Floxy UI server library
//!
//! Assembles the workflow API and the single-page UI behind one listener:
//! - configuration from the environment
//! - database pool lifecycle
//! - engine and plugin assembly
//! - route composition (API, static assets, UI fallback)
//! - process lifecycle and signal-driven shutdown

pub mod assembly;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pool;
pub mod router;
pub mod server;

pub use assembly::{
    Assembly, AssemblyOptions, EngineAssembly, FixedActorResolver, PluginBinding, PluginKind,
};
pub use config::{Config, DatabaseConfig, EngineMode};
pub use error::{ConnectionError, ServeError, ServerError, ServerResult};
pub use lifecycle::{shutdown_signal, Lifecycle, LifecycleState};
pub use pool::{ConnectionPool, CLOSE_GRACE};
pub use server::Server;
