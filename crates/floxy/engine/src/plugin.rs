//! Extension points of the API server

use crate::error::AuthError;
use axum::http::HeaderMap;
use axum::Router;

/// Decides which identity an inbound request acts as
pub trait AuthResolver: Send + Sync + 'static {
    fn resolve(&self, headers: &HeaderMap) -> Result<String, AuthError>;
}

impl<F> AuthResolver for F
where
    F: Fn(&HeaderMap) -> Result<String, AuthError> + Send + Sync + 'static,
{
    fn resolve(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        self(headers)
    }
}

/// A unit of API routes mounted on the shared mux
pub trait Plugin: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Add this plugin's routes to `router`
    fn register_routes(&self, router: Router) -> Router;
}
