//! Typed relations between facts.

use serde::{Deserialize, Serialize};

/// The only link type the core emits: new fact supersedes old fact.
pub const LINK_SUPERSEDES: &str = "supersedes";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactLink {
    pub id: i64,
    pub from_fact_id: i64,
    pub to_fact_id: i64,
    pub link_type: String,
}
