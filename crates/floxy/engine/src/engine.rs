//! Instance control operations
//!
//! The engine never executes workflow steps here; it only records operator
//! interventions (cancel, abort, human decisions) transactionally, together
//! with an event naming the actor responsible.

use crate::error::{EngineError, EngineResult};
use crate::model::WorkflowInstance;
use crate::store::Store;
use crate::tx::TxManager;
use serde_json::{json, Value};
use sqlx::{Postgres, Transaction};
use std::fmt;
use std::str::FromStr;

/// Outcome of a human decision step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Confirm => "confirm",
            Decision::Reject => "reject",
        }
    }

    /// Step status recorded once the decision is made
    pub fn step_status(&self) -> &'static str {
        match self {
            Decision::Confirm => "confirmed",
            Decision::Reject => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirm" => Ok(Decision::Confirm),
            "reject" => Ok(Decision::Reject),
            other => Err(EngineError::InvalidInput(format!(
                "unknown decision '{}', expected 'confirm' or 'reject'",
                other
            ))),
        }
    }
}

/// Workflow engine handle shared by the API plugins
#[derive(Debug, Clone)]
pub struct Engine {
    tx: TxManager,
    store: Store,
}

impl Engine {
    pub fn new(tx: TxManager, store: Store) -> Self {
        Self { tx, store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Stop a pending or running instance
    pub async fn cancel_instance(
        &self,
        instance_id: i64,
        actor: &str,
        reason: &str,
    ) -> EngineResult<()> {
        self.interrupt(instance_id, "cancelled", "cancel_requested", actor, reason)
            .await
    }

    /// Terminate a pending or running instance without compensation
    pub async fn abort_instance(
        &self,
        instance_id: i64,
        actor: &str,
        reason: &str,
    ) -> EngineResult<()> {
        self.interrupt(instance_id, "aborted", "abort_requested", actor, reason)
            .await
    }

    /// Resolve a step waiting for a human decision
    pub async fn make_human_decision(
        &self,
        step_id: i64,
        actor: &str,
        decision: Decision,
        message: &str,
    ) -> EngineResult<()> {
        let mut tx = self.tx.begin().await?;

        let output = json!({
            "decision": decision.as_str(),
            "decided_by": actor,
            "message": message,
        });

        let instance_id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE workflows.workflow_steps
            SET status = $2, output = $3, completed_at = NOW()
            WHERE id = $1 AND status = 'waiting_decision'
            RETURNING instance_id
            "#,
        )
        .bind(step_id)
        .bind(decision.step_status())
        .bind(&output)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(instance_id) = instance_id else {
            return Err(EngineError::Conflict(format!(
                "step {} is not waiting for a decision",
                step_id
            )));
        };

        record_event(&mut tx, instance_id, Some(step_id), "human_decision", &output).await?;
        tx.commit().await?;

        tracing::info!(
            instance_id,
            step_id,
            decision = %decision,
            actor,
            "Recorded human decision"
        );
        Ok(())
    }

    async fn interrupt(
        &self,
        instance_id: i64,
        status: &str,
        event_type: &str,
        actor: &str,
        reason: &str,
    ) -> EngineResult<()> {
        let mut tx = self.tx.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE workflows.workflow_instances
            SET status = $2, completed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'running')
            "#,
        )
        .bind(instance_id)
        .bind(status)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Err(interrupt_rejection(
                instance_id,
                self.store.get_instance(instance_id).await?.as_ref(),
                status,
            ));
        }

        let payload = json!({ "actor": actor, "reason": reason });
        record_event(&mut tx, instance_id, None, event_type, &payload).await?;
        tx.commit().await?;

        tracing::info!(instance_id, status, actor, "Interrupted workflow instance");
        Ok(())
    }
}

// Why an interrupt updated no row, given the instance as it reads now.
fn interrupt_rejection(
    instance_id: i64,
    instance: Option<&WorkflowInstance>,
    status: &str,
) -> EngineError {
    match instance {
        None => EngineError::NotFound(format!("instance {} not found", instance_id)),
        Some(instance) if instance.is_interruptible() => EngineError::Conflict(format!(
            "instance {} changed state concurrently, retry",
            instance_id
        )),
        Some(instance) => EngineError::Conflict(format!(
            "instance {} is {} and cannot be {}",
            instance_id, instance.status, status
        )),
    }
}

async fn record_event(
    tx: &mut Transaction<'static, Postgres>,
    instance_id: i64,
    step_id: Option<i64>,
    event_type: &str,
    payload: &Value,
) -> EngineResult<()> {
    sqlx::query(
        r#"
        INSERT INTO workflows.workflow_events (instance_id, step_id, event_type, payload)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(instance_id)
    .bind(step_id)
    .bind(event_type)
    .bind(payload)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parsing() {
        assert_eq!("confirm".parse::<Decision>().unwrap(), Decision::Confirm);
        assert_eq!("reject".parse::<Decision>().unwrap(), Decision::Reject);
        assert!(matches!(
            "maybe".parse::<Decision>(),
            Err(EngineError::InvalidInput(_))
        ));
    }

    fn instance(status: &str) -> WorkflowInstance {
        let now = chrono::Utc::now();
        WorkflowInstance {
            id: 7,
            workflow_id: "order".to_string(),
            status: status.to_string(),
            input: None,
            output: None,
            error: None,
            started_at: Some(now),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_interrupt_rejection() {
        assert!(matches!(
            interrupt_rejection(7, None, "cancelled"),
            EngineError::NotFound(_)
        ));

        let completed = instance("completed");
        match interrupt_rejection(7, Some(&completed), "cancelled") {
            EngineError::Conflict(msg) => assert!(msg.contains("is completed")),
            other => panic!("unexpected error: {:?}", other),
        }

        let running = instance("running");
        match interrupt_rejection(7, Some(&running), "aborted") {
            EngineError::Conflict(msg) => assert!(msg.contains("concurrently")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decision_step_status() {
        assert_eq!(Decision::Confirm.step_status(), "confirmed");
        assert_eq!(Decision::Reject.step_status(), "rejected");
    }
}
