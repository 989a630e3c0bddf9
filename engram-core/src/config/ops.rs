//! Operation-tracker thresholds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationsConfig {
    /// A `running` operation older than this is considered stuck.
    pub stuck_threshold_minutes: i64,
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            stuck_threshold_minutes: 60,
        }
    }
}
