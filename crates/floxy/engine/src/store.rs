//! Read access to the `workflows` schema

use crate::error::EngineResult;
use crate::model::{
    ActiveWorkflow, SummaryStats, WorkflowDefinition, WorkflowEvent, WorkflowInstance,
    WorkflowStats, WorkflowStep,
};
use sqlx::{PgPool, Row};

/// PostgreSQL-backed workflow store
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All definitions, newest version first within a name
    pub async fn list_workflows(&self) -> EngineResult<Vec<WorkflowDefinition>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, version, definition, created_at
            FROM workflows.workflow_definitions
            ORDER BY name, version DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| WorkflowDefinition::from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn get_workflow(&self, id: &str) -> EngineResult<Option<WorkflowDefinition>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, version, definition, created_at
            FROM workflows.workflow_definitions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(WorkflowDefinition::from_row).transpose()?)
    }

    pub async fn list_workflow_instances(
        &self,
        workflow_id: &str,
        limit: i64,
        offset: i64,
    ) -> EngineResult<Vec<WorkflowInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT id, workflow_id, status, input, output, error,
                   started_at, completed_at, created_at, updated_at
            FROM workflows.workflow_instances
            WHERE workflow_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(workflow_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| WorkflowInstance::from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn list_active_instances(&self) -> EngineResult<Vec<ActiveWorkflow>> {
        let rows = sqlx::query(
            r#"
            SELECT id, workflow_id, status, created_at, updated_at,
                   duration_seconds::float8 AS duration_seconds,
                   total_steps::bigint AS total_steps,
                   completed_steps::bigint AS completed_steps,
                   failed_steps::bigint AS failed_steps,
                   running_steps::bigint AS running_steps,
                   compensation_steps::bigint AS compensation_steps,
                   rolled_back_steps::bigint AS rolled_back_steps
            FROM workflows.active_workflows
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ActiveWorkflow::from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn get_instance(&self, id: i64) -> EngineResult<Option<WorkflowInstance>> {
        let row = sqlx::query(
            r#"
            SELECT id, workflow_id, status, input, output, error,
                   started_at, completed_at, created_at, updated_at
            FROM workflows.workflow_instances
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(WorkflowInstance::from_row).transpose()?)
    }

    pub async fn list_instance_steps(&self, instance_id: i64) -> EngineResult<Vec<WorkflowStep>> {
        let rows = sqlx::query(
            r#"
            SELECT id, instance_id, step_name, step_type, status, input, output, error,
                   retry_count, max_retries, compensation_retry_count,
                   started_at, completed_at, created_at
            FROM workflows.workflow_steps
            WHERE instance_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(instance_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| WorkflowStep::from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn list_instance_events(
        &self,
        instance_id: i64,
        limit: i64,
    ) -> EngineResult<Vec<WorkflowEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, instance_id, step_id, event_type, payload, created_at
            FROM workflows.workflow_events
            WHERE instance_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(instance_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| WorkflowEvent::from_row(row).map_err(Into::into))
            .collect()
    }

    /// Latest step of the instance still waiting for a human decision
    pub async fn find_waiting_decision_step(
        &self,
        instance_id: i64,
    ) -> EngineResult<Option<WorkflowStep>> {
        let row = sqlx::query(
            r#"
            SELECT id, instance_id, step_name, step_type, status, input, output, error,
                   retry_count, max_retries, compensation_retry_count,
                   started_at, completed_at, created_at
            FROM workflows.workflow_steps
            WHERE instance_id = $1 AND status = 'waiting_decision'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(instance_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(WorkflowStep::from_row).transpose()?)
    }

    pub async fn workflow_stats(&self) -> EngineResult<Vec<WorkflowStats>> {
        let rows = sqlx::query(
            r#"
            SELECT name, version,
                   total_instances::bigint AS total_instances,
                   completed::bigint AS completed,
                   failed::bigint AS failed,
                   running::bigint AS running,
                   avg_duration_seconds::float8 AS avg_duration_seconds
            FROM workflows.workflow_stats
            ORDER BY name, version
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| WorkflowStats::from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn summary_stats(&self) -> EngineResult<SummaryStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_workflows,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_workflows,
                COUNT(*) FILTER (WHERE status = 'failed') AS failed_workflows,
                COUNT(*) FILTER (WHERE status = 'running') AS running_workflows,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_workflows
            FROM workflows.workflow_instances
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let active_workflows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workflows.active_workflows")
                .fetch_one(&self.pool)
                .await?;

        Ok(SummaryStats {
            total_workflows: row.try_get("total_workflows")?,
            completed_workflows: row.try_get("completed_workflows")?,
            failed_workflows: row.try_get("failed_workflows")?,
            running_workflows: row.try_get("running_workflows")?,
            pending_workflows: row.try_get("pending_workflows")?,
            active_workflows,
        })
    }
}
