//! Human decision plugin: `POST /api/instances/:id/make-decision/:decision`

use crate::engine::{Decision, Engine};
use crate::error::{ApiError, ApiResult};
use crate::plugin::{AuthResolver, Plugin};
use crate::store::Store;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Confirms or rejects the step an instance is waiting on
#[derive(Clone)]
pub struct HumanDecisionPlugin {
    engine: Arc<Engine>,
    store: Store,
    resolver: Arc<dyn AuthResolver>,
}

impl HumanDecisionPlugin {
    pub fn new(engine: Arc<Engine>, store: Store, resolver: Arc<dyn AuthResolver>) -> Self {
        Self {
            engine,
            store,
            resolver,
        }
    }
}

impl Plugin for HumanDecisionPlugin {
    fn name(&self) -> &'static str {
        "human-decision"
    }

    fn register_routes(&self, router: Router) -> Router {
        router.merge(
            Router::new()
                .route(
                    "/api/instances/:id/make-decision/:decision",
                    post(make_decision),
                )
                .with_state(self.clone()),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub instance_id: i64,
    pub step_id: i64,
    pub decision: String,
    pub actor: String,
}

async fn make_decision(
    State(plugin): State<HumanDecisionPlugin>,
    Path((id, decision)): Path<(i64, String)>,
    headers: HeaderMap,
    body: Option<Json<DecisionRequest>>,
) -> ApiResult<Json<DecisionResponse>> {
    let decision: Decision = decision.parse()?;
    let actor = plugin.resolver.resolve(&headers)?;
    let Json(request) = body.unwrap_or_default();

    if plugin.store.get_instance(id).await?.is_none() {
        return Err(ApiError::NotFound(format!("instance {} not found", id)));
    }

    let step = plugin
        .store
        .find_waiting_decision_step(id)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict(format!("instance {} has no step waiting for a decision", id))
        })?;

    plugin
        .engine
        .make_human_decision(step.id, &actor, decision, &request.message)
        .await?;

    Ok(Json(DecisionResponse {
        instance_id: id,
        step_id: step.id,
        decision: decision.as_str().to_string(),
        actor,
    }))
}
