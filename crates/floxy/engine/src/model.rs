//! Row types returned by the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::Row;

/// A registered workflow definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    pub version: i32,
    pub definition: Value,
    pub created_at: DateTime<Utc>,
}

impl WorkflowDefinition {
    pub(crate) fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            version: row.try_get("version")?,
            definition: row.try_get("definition")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// One execution of a workflow definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: i64,
    pub workflow_id: String,
    pub status: String,
    pub input: Option<Value>,
    pub output: Option<Value>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowInstance {
    pub(crate) fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            workflow_id: row.try_get("workflow_id")?,
            status: row.try_get("status")?,
            input: row.try_get("input")?,
            output: row.try_get("output")?,
            error: row.try_get("error")?,
            started_at: row.try_get("started_at")?,
            completed_at: row.try_get("completed_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Whether the instance can still be cancelled or aborted
    pub fn is_interruptible(&self) -> bool {
        is_interruptible_status(&self.status)
    }
}

pub(crate) fn is_interruptible_status(status: &str) -> bool {
    matches!(status, "pending" | "running")
}

/// A step of a workflow instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: i64,
    pub instance_id: i64,
    pub step_name: String,
    pub step_type: String,
    pub status: String,
    pub input: Option<Value>,
    pub output: Option<Value>,
    pub error: Option<String>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub compensation_retry_count: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WorkflowStep {
    pub(crate) fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            instance_id: row.try_get("instance_id")?,
            step_name: row.try_get("step_name")?,
            step_type: row.try_get("step_type")?,
            status: row.try_get("status")?,
            input: row.try_get("input")?,
            output: row.try_get("output")?,
            error: row.try_get("error")?,
            retry_count: row.try_get("retry_count")?,
            max_retries: row.try_get("max_retries")?,
            compensation_retry_count: row.try_get("compensation_retry_count")?,
            started_at: row.try_get("started_at")?,
            completed_at: row.try_get("completed_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// An entry of an instance's event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub id: i64,
    pub instance_id: i64,
    pub step_id: Option<i64>,
    pub event_type: String,
    pub payload: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl WorkflowEvent {
    pub(crate) fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            instance_id: row.try_get("instance_id")?,
            step_id: row.try_get("step_id")?,
            event_type: row.try_get("event_type")?,
            payload: row.try_get("payload")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Progress view of a running instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveWorkflow {
    pub id: i64,
    pub workflow_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub duration_seconds: Option<f64>,
    pub total_steps: i64,
    pub completed_steps: i64,
    pub failed_steps: i64,
    pub running_steps: i64,
    pub compensation_steps: i64,
    pub rolled_back_steps: i64,
}

impl ActiveWorkflow {
    pub(crate) fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            workflow_id: row.try_get("workflow_id")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            duration_seconds: row.try_get("duration_seconds")?,
            total_steps: row.try_get("total_steps")?,
            completed_steps: row.try_get("completed_steps")?,
            failed_steps: row.try_get("failed_steps")?,
            running_steps: row.try_get("running_steps")?,
            compensation_steps: row.try_get("compensation_steps")?,
            rolled_back_steps: row.try_get("rolled_back_steps")?,
        })
    }
}

/// Per-definition execution statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStats {
    pub name: String,
    pub version: i32,
    pub total_instances: i64,
    pub completed: i64,
    pub failed: i64,
    pub running: i64,
    pub avg_duration_seconds: Option<f64>,
}

impl WorkflowStats {
    pub(crate) fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            name: row.try_get("name")?,
            version: row.try_get("version")?,
            total_instances: row.try_get("total_instances")?,
            completed: row.try_get("completed")?,
            failed: row.try_get("failed")?,
            running: row.try_get("running")?,
            avg_duration_seconds: row.try_get("avg_duration_seconds")?,
        })
    }
}

/// Instance counts across all definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_workflows: i64,
    pub completed_workflows: i64,
    pub failed_workflows: i64,
    pub running_workflows: i64,
    pub pending_workflows: i64,
    pub active_workflows: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interruptible_statuses() {
        assert!(is_interruptible_status("pending"));
        assert!(is_interruptible_status("running"));
        assert!(!is_interruptible_status("completed"));
        assert!(!is_interruptible_status("cancelled"));
        assert!(!is_interruptible_status("aborted"));
    }

    #[test]
    fn test_summary_serializes_flat() {
        let summary = SummaryStats {
            total_workflows: 4,
            running_workflows: 1,
            active_workflows: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_workflows"], 4);
        assert_eq!(json["active_workflows"], 1);
    }
}
