//! Stuck-operation detection and recovery.

use chrono::{Duration, Utc};

use engram_core::config::OperationsConfig;
use engram_core::errors::EngramResult;
use engram_core::models::OperationProgress;
use engram_storage::queries::operation_ops;
use engram_storage::Store;

/// Finds `running` operation rows whose writer has evidently crashed, and
/// resets them so new runs may start.
pub struct OperationTracker {
    config: OperationsConfig,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self {
            config: OperationsConfig::default(),
        }
    }

    pub fn with_config(config: OperationsConfig) -> Self {
        Self { config }
    }

    /// `running` rows older than the configured threshold.
    pub fn stuck_operations(&self, store: &Store) -> EngramResult<Vec<OperationProgress>> {
        let cutoff = Utc::now() - Duration::minutes(self.config.stuck_threshold_minutes);
        store.read(|conn| operation_ops::stuck_operations(conn, cutoff))
    }

    /// Reset every stuck row to `failed`. Returns how many were reset.
    pub fn reset_stuck(&self, store: &Store) -> EngramResult<usize> {
        let cutoff = Utc::now() - Duration::minutes(self.config.stuck_threshold_minutes);
        let reset = store
            .transaction_with_retry(|conn| operation_ops::reset_stuck_operations(conn, cutoff))?;
        if reset > 0 {
            tracing::warn!(reset, "stuck operations reset to failed");
        }
        Ok(reset)
    }
}

impl Default for OperationTracker {
    fn default() -> Self {
        Self::new()
    }
}
