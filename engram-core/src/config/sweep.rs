//! Sweeper budgets and retention windows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Wall-clock budget per sweep run, in seconds.
    pub budget_seconds: f64,
    /// Proposed facts older than this are expired.
    pub proposed_ttl_days: i64,
    /// Disputed facts older than this are expired.
    pub disputed_ttl_days: i64,
    /// Unreferenced content older than this is deleted.
    pub content_retention_days: i64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            budget_seconds: 5.0,
            proposed_ttl_days: 14,
            disputed_ttl_days: 30,
            content_retention_days: 30,
        }
    }
}
