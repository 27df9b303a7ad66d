//! HTTP API server
//!
//! The server owns the route mux. Store-backed read routes are always
//! mounted; plugins add their own routes on top. An engine is optional: a
//! server built without one only serves reads.

use crate::engine::Engine;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    ActiveWorkflow, SummaryStats, WorkflowDefinition, WorkflowEvent, WorkflowInstance,
    WorkflowStats, WorkflowStep,
};
use crate::plugin::Plugin;
use crate::store::Store;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Workflow API server
pub struct ApiServer {
    engine: Option<Arc<Engine>>,
    store: Store,
    plugins: Vec<Box<dyn Plugin>>,
}

impl ApiServer {
    pub fn new(engine: Option<Arc<Engine>>, store: Store) -> Self {
        Self {
            engine,
            store,
            plugins: Vec::new(),
        }
    }

    /// Attach plugins whose routes are mounted by [`ApiServer::mux`]
    pub fn with_plugins(mut self, plugins: Vec<Box<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    pub fn engine(&self) -> Option<&Arc<Engine>> {
        self.engine.as_ref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Build the route mux
    pub fn mux(&self) -> Router {
        let state = ApiState {
            store: self.store.clone(),
            engine_enabled: self.engine.is_some(),
        };

        let mut router = Router::new()
            .route("/api/health", get(health))
            .route("/api/workflows", get(list_workflows))
            .route("/api/workflows/:id", get(get_workflow))
            .route("/api/workflows/:id/instances", get(list_workflow_instances))
            .route("/api/instances/active", get(list_active_instances))
            .route("/api/instances/:id", get(get_instance))
            .route("/api/instances/:id/steps", get(list_instance_steps))
            .route("/api/instances/:id/events", get(list_instance_events))
            .route("/api/stats", get(workflow_stats))
            .route("/api/stats/summary", get(summary_stats))
            .with_state(state);

        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), "Registering plugin routes");
            router = plugin.register_routes(router);
        }

        router
    }
}

#[derive(Clone)]
struct ApiState {
    store: Store,
    engine_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mode: String,
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let mode = if state.engine_enabled { "full" } else { "minimal" };
    Json(HealthResponse {
        status: "ok".to_string(),
        mode: mode.to_string(),
    })
}

async fn list_workflows(State(state): State<ApiState>) -> ApiResult<Json<Vec<WorkflowDefinition>>> {
    Ok(Json(state.store.list_workflows().await?))
}

async fn get_workflow(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkflowDefinition>> {
    let workflow = state
        .store
        .get_workflow(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Workflow {} not found", id)))?;

    Ok(Json(workflow))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_page_limit() -> i64 {
    50
}

async fn list_workflow_instances(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<WorkflowInstance>>> {
    if page.limit < 0 || page.offset < 0 {
        return Err(ApiError::BadRequest(
            "limit and offset must not be negative".to_string(),
        ));
    }

    let instances = state
        .store
        .list_workflow_instances(&id, page.limit, page.offset)
        .await?;

    Ok(Json(instances))
}

async fn list_active_instances(
    State(state): State<ApiState>,
) -> ApiResult<Json<Vec<ActiveWorkflow>>> {
    Ok(Json(state.store.list_active_instances().await?))
}

async fn get_instance(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<WorkflowInstance>> {
    let instance = state
        .store
        .get_instance(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Instance {} not found", id)))?;

    Ok(Json(instance))
}

async fn list_instance_steps(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<WorkflowStep>>> {
    Ok(Json(state.store.list_instance_steps(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default = "default_events_limit")]
    pub limit: i64,
}

fn default_events_limit() -> i64 {
    100
}

async fn list_instance_events(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<Json<Vec<WorkflowEvent>>> {
    if query.limit < 0 {
        return Err(ApiError::BadRequest("limit must not be negative".to_string()));
    }

    Ok(Json(state.store.list_instance_events(id, query.limit).await?))
}

async fn workflow_stats(State(state): State<ApiState>) -> ApiResult<Json<Vec<WorkflowStats>>> {
    Ok(Json(state.store.workflow_stats().await?))
}

async fn summary_stats(State(state): State<ApiState>) -> ApiResult<Json<SummaryStats>> {
    Ok(Json(state.store.summary_stats().await?))
}
