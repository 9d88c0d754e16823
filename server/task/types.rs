use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::search::Candidate;
use crate::store::Update;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Reserved for future autonomous execution; creation currently jumps
    /// straight to `AwaitingApproval` because candidate generation is
    /// synchronous.
    Queued,
    Running,
    AwaitingApproval,
    Succeeded,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Running => "running",
            TaskStatus::AwaitingApproval => "awaiting_approval",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

/// One shopping run: a prompt plus its candidate products and resolution.
/// The candidate list is fixed at creation and approval refers to entries
/// strictly by position. `logs` is append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub bot_id: String,
    pub prompt: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub selection: Option<Candidate>,
    #[serde(default)]
    pub logs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The only mutation the workflow ever writes back to a persisted task.
/// Keeping the mutable fields enumerated here is what stops other code
/// paths from merging arbitrary payloads into task documents.
#[derive(Clone, Debug)]
pub struct TaskUpdate {
    pub status: TaskStatus,
    pub selection: Candidate,
}

impl TaskUpdate {
    pub fn to_store_update(&self) -> Result<Update, serde_json::Error> {
        Ok(Update::new()
            .set("status", self.status.as_str())
            .set("selection", serde_json::to_value(&self.selection)?))
    }
}
