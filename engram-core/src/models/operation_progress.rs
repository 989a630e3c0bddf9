//! Long-running operation state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Running,
    Completed,
    Failed,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Running => "running",
            OperationStatus::Completed => "completed",
            OperationStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(OperationStatus::Running),
            "completed" => Some(OperationStatus::Completed),
            "failed" => Some(OperationStatus::Failed),
            _ => None,
        }
    }
}

/// Progress of a long-running operation. A row stuck in `running` past the
/// configured threshold indicates a crashed writer and is resettable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationProgress {
    pub id: i64,
    pub operation_type: String,
    pub scope: String,
    pub status: OperationStatus,
    pub total_items: i64,
    pub processed_items: i64,
    /// Operation-specific resume state, as JSON.
    pub checkpoint_data: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
