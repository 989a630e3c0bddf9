//! Per-transcript resume points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resume point for a transcript, unique by `(session_id, transcript_path)`.
///
/// `last_byte_offset` advances only after the enclosing ingestion
/// transaction commits, and never decreases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaCursor {
    pub session_id: String,
    pub transcript_path: String,
    pub last_byte_offset: u64,
    pub updated_at: DateTime<Utc>,
}
