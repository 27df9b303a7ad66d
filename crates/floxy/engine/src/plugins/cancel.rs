//! Cancel plugin: `POST /api/instances/:id/cancel`

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

/// Lets an operator cancel a pending or running instance
#[derive(Clone)]
pub struct CancelPlugin {
    engine: Arc<Engine>,
    resolver: Arc<dyn AuthResolver>,
}

impl CancelPlugin {
    pub fn new(engine: Arc<Engine>, resolver: Arc<dyn AuthResolver>) -> Self {
        Self { engine, resolver }
    }
}

impl Plugin for CancelPlugin {
    fn name(&self) -> &'static str {
        "cancel"
    }

    fn register_routes(&self, router: Router) -> Router {
        router.merge(
            Router::new()
                .route("/api/instances/:id/cancel", post(cancel_instance))
                .with_state(self.clone()),
        )
    }
}

async fn cancel_instance(
    State(plugin): State<CancelPlugin>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Option<Json<InterruptRequest>>,
) -> ApiResult<Json<InterruptResponse>> {
    let actor = plugin.resolver.resolve(&headers)?;
    let Json(request) = body.unwrap_or_default();

    plugin
        .engine
        .cancel_instance(id, &actor, &request.reason)
        .await?;

    Ok(Json(InterruptResponse {
        instance_id: id,
        status: "cancelled".to_string(),
        actor,
    }))
}
