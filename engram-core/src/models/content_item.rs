//! Ingested transcript delta chunks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingested delta chunk.
///
/// `(transcript_path, source_mtime)` identifies a previously-processed file
/// version; `(text_hash, session_id)` is the upsert fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    /// Origin tag, e.g. `"transcript"`.
    pub source: String,
    pub session_id: Option<String>,
    pub transcript_path: Option<String>,
    pub project_path: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub ingested_at: DateTime<Utc>,
    /// SHA-256 of the sanitized delta, lowercase hex.
    pub text_hash: String,
    /// Byte length of the sanitized delta.
    pub byte_len: i64,
    pub raw_text: Option<String>,
    /// Modification time of the source file at ingestion.
    pub source_mtime: Option<DateTime<Utc>>,
    pub git_branch: Option<String>,
    pub cwd: Option<String>,
    pub host_version: Option<String>,
    pub thinking_level: Option<String>,
    pub metadata_json: Option<String>,
}

/// Insertion payload for a content item.
#[derive(Debug, Clone, Default)]
pub struct NewContentItem {
    pub source: String,
    pub session_id: Option<String>,
    pub transcript_path: Option<String>,
    pub project_path: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub text_hash: String,
    pub byte_len: i64,
    pub raw_text: Option<String>,
    pub source_mtime: Option<DateTime<Utc>>,
    pub git_branch: Option<String>,
    pub cwd: Option<String>,
    pub host_version: Option<String>,
    pub thinking_level: Option<String>,
    pub metadata_json: Option<String>,
}
