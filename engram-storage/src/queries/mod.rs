//! Typed query modules. Free functions over `&Connection`, surfaced as
//! [`crate::Store`] methods.

pub mod conflict_ops;
pub mod content_ops;
pub mod cursor_ops;
pub mod entity_ops;
pub mod fact_ops;
pub mod fts;
pub mod health_ops;
pub mod link_ops;
pub mod maintenance;
pub mod operation_ops;
pub mod provenance_ops;
pub mod tool_call_ops;

use chrono::{DateTime, Utc};

use engram_core::errors::EngramResult;

use crate::to_storage_err;

/// Parse an RFC-3339 timestamp column.
pub(crate) fn parse_dt(s: &str) -> EngramResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}

/// Parse an optional RFC-3339 timestamp column.
pub(crate) fn parse_dt_opt(s: Option<String>) -> EngramResult<Option<DateTime<Utc>>> {
    s.as_deref().map(parse_dt).transpose()
}

/// Placeholder list `?1, ?2, …` for an `IN (…)` clause.
pub(crate) fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}
