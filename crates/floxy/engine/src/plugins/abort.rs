//! Abort plugin: `POST /api/instances/:id/abort`

use super::{InterruptRequest, InterruptResponse};
use crate::engine::Engine;
use crate::error::ApiResult;
use crate::plugin::{AuthResolver, Plugin};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Lets an operator abort a pending or running instance immediately
#[derive(Clone)]
pub struct AbortPlugin {
    engine: Arc<Engine>,
    resolver: Arc<dyn AuthResolver>,
}

impl AbortPlugin {
    pub fn new(engine: Arc<Engine>, resolver: Arc<dyn AuthResolver>) -> Self {
        Self { engine, resolver }
    }
}

impl Plugin for AbortPlugin {
    fn name(&self) -> &'static str {
        "abort"
    }

    fn register_routes(&self, router: Router) -> Router {
        router.merge(
            Router::new()
                .route("/api/instances/:id/abort", post(abort_instance))
                .with_state(self.clone()),
        )
    }
}

async fn abort_instance(
    State(plugin): State<AbortPlugin>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Option<Json<InterruptRequest>>,
) -> ApiResult<Json<InterruptResponse>> {
    let actor = plugin.resolver.resolve(&headers)?;
    let Json(request) = body.unwrap_or_default();

    plugin
        .engine
        .abort_instance(id, &actor, &request.reason)
        .await?;

    Ok(Json(InterruptResponse {
        instance_id: id,
        status: "aborted".to_string(),
        actor,
    }))
}
