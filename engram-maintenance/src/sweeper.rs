//! Four sweep phases behind one wall-clock budget.
//!
//! Phases are independent; each runs only if budget remains, and each is
//! atomic to its own statement. The sweeper is the only component that
//! physically deletes anything.

use std::time::Instant;

use chrono::{Duration, Utc};

use engram_core::config::SweepConfig;
use engram_core::errors::EngramResult;
use engram_core::models::FactStatus;
use engram_storage::queries::{fts, maintenance};
use engram_storage::Store;

/// What one sweep did, and whether it stayed inside its budget.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepReport {
    pub proposed_expired: usize,
    pub disputed_expired: usize,
    pub provenance_pruned: usize,
    pub content_pruned: usize,
    pub elapsed_seconds: f64,
    pub budget_honored: bool,
}

pub struct Sweeper {
    config: SweepConfig,
}

impl Sweeper {
    pub fn new() -> Self {
        Self {
            config: SweepConfig::default(),
        }
    }

    pub fn with_config(config: SweepConfig) -> Self {
        Self { config }
    }

    /// Run with the configured budget.
    pub fn run(&self, store: &Store) -> EngramResult<SweepReport> {
        self.run_with_budget(store, self.config.budget_seconds)
    }

    /// Run with an explicit budget in seconds.
    pub fn run_with_budget(&self, store: &Store, budget_seconds: f64) -> EngramResult<SweepReport> {
        let started = Instant::now();
        let mut report = SweepReport::default();
        let within_budget = |started: &Instant| started.elapsed().as_secs_f64() <= budget_seconds;

        // Phase 1: proposed facts past their TTL.
        if within_budget(&started) {
            let cutoff = Utc::now() - Duration::days(self.config.proposed_ttl_days);
            report.proposed_expired = store.transaction_with_retry(|conn| {
                maintenance::expire_facts_older_than(conn, FactStatus::Proposed, cutoff)
            })?;
        }

        // Phase 2: disputed facts past their TTL.
        if within_budget(&started) {
            let cutoff = Utc::now() - Duration::days(self.config.disputed_ttl_days);
            report.disputed_expired = store.transaction_with_retry(|conn| {
                maintenance::expire_facts_older_than(conn, FactStatus::Disputed, cutoff)
            })?;
        }

        // Phase 3: provenance whose fact is gone.
        if within_budget(&started) {
            report.provenance_pruned =
                store.transaction_with_retry(maintenance::delete_orphaned_provenance)?;
        }

        // Phase 4: old content nothing references, plus its index rows.
        if within_budget(&started) {
            let cutoff = Utc::now() - Duration::days(self.config.content_retention_days);
            report.content_pruned = store.transaction_with_retry(|conn| {
                let deleted = maintenance::delete_unreferenced_content(conn, cutoff)?;
                fts::prune_index(conn)?;
                Ok(deleted)
            })?;
        }

        report.elapsed_seconds = started.elapsed().as_secs_f64();
        report.budget_honored = report.elapsed_seconds <= budget_seconds;

        tracing::info!(
            proposed = report.proposed_expired,
            disputed = report.disputed_expired,
            provenance = report.provenance_pruned,
            content = report.content_pruned,
            elapsed = report.elapsed_seconds,
            "sweep finished"
        );
        Ok(report)
    }
}

impl Default for Sweeper {
    fn default() -> Self {
        Self::new()
    }
}
