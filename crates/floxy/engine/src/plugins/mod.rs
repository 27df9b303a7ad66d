//! Built-in API plugins
//!
//! Each plugin owns an [`AuthResolver`](crate::AuthResolver) and asks it for
//! the acting identity before touching the engine.

mod abort;
mod cancel;
mod human_decision;

pub use abort::AbortPlugin;
pub use cancel::CancelPlugin;
pub use human_decision::HumanDecisionPlugin;

use serde::{Deserialize, Serialize};

/// Body accepted by the cancel and abort endpoints
#[derive(Debug, Default, Deserialize)]
pub struct InterruptRequest {
    #[serde(default)]
    pub reason: String,
}

/// Response of the cancel and abort endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct InterruptResponse {
    pub instance_id: i64,
    pub status: String,
    pub actor: String,
}
