//! The ingestion pipeline.
//!
//! One transaction per delta: content upsert, tool calls, lexical index,
//! and the cursor advance, in that order with the cursor last. A failure
//! anywhere rolls the whole unit back, leaving the cursor where it was so
//! the next attempt reprocesses the same bytes.

use std::path::Path;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use engram_core::errors::{EngramError, EngramResult, IngestError};
use engram_core::models::NewContentItem;
use engram_core::traits::ISanitizer;
use engram_privacy::Sanitizer;
use engram_storage::queries::{content_ops, cursor_ops, fts, tool_call_ops};
use engram_storage::Store;

use crate::metadata;
use crate::transcript;

/// Result of one ingestion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The file version was already processed (mtime gate).
    Skipped { reason: &'static str },
    /// Nothing past the saved cursor.
    NoChange,
    Ingested {
        content_id: i64,
        bytes_read: u64,
        project_path: Option<String>,
    },
}

pub struct Ingester<'a> {
    store: &'a Store,
    sanitizer: Sanitizer,
}

impl<'a> Ingester<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            sanitizer: Sanitizer::new(),
        }
    }

    /// Ingest the unread tail of a transcript.
    pub fn ingest(
        &self,
        source: &str,
        session_id: &str,
        transcript_path: &str,
        project_path: Option<&str>,
    ) -> EngramResult<IngestOutcome> {
        if session_id.is_empty() {
            return Err(EngramError::Payload { field: "session_id" });
        }
        if transcript_path.is_empty() {
            return Err(EngramError::Payload {
                field: "transcript_path",
            });
        }

        let path = Path::new(transcript_path);

        // Incremental-sync gate: an already-seen (path, mtime) pair means
        // this file version was fully processed.
        let source_mtime = file_mtime(path)?;
        if let Some(mtime) = source_mtime {
            if self
                .store
                .content_item_by_transcript_and_mtime(transcript_path, mtime)?
                .is_some()
            {
                return Ok(IngestOutcome::Skipped { reason: "unchanged" });
            }
        }

        let current_offset = self.store.get_delta_cursor(session_id, transcript_path)?;
        let Some((raw_delta, new_offset)) = transcript::read_delta(path, current_offset)? else {
            return Ok(IngestOutcome::NoChange);
        };

        // Metadata and tool calls come from the raw delta; storage gets the
        // sanitized text.
        let session_meta = metadata::extract_metadata(&raw_delta);
        let tool_calls = metadata::extract_tool_calls(&raw_delta);
        let sanitized = self.sanitizer.sanitize(&raw_delta)?;

        let text_hash = sha256_hex(&sanitized.text);
        let item = NewContentItem {
            source: source.to_string(),
            session_id: Some(session_id.to_string()),
            transcript_path: Some(transcript_path.to_string()),
            project_path: project_path.map(str::to_string),
            occurred_at: source_mtime,
            text_hash,
            byte_len: sanitized.text.len() as i64,
            raw_text: Some(sanitized.text.clone()),
            source_mtime,
            git_branch: session_meta.git_branch,
            cwd: session_meta.cwd,
            host_version: session_meta.host_version,
            thinking_level: session_meta.thinking_level,
            metadata_json: None,
        };

        let content_id = self
            .store
            .transaction_with_retry(|conn| {
                let content_id = content_ops::upsert_content_item(conn, &item)?;
                if !tool_calls.is_empty() {
                    tool_call_ops::insert_tool_calls(conn, content_id, &tool_calls)?;
                }
                fts::index_content(conn, content_id, item.raw_text.as_deref().unwrap_or(""))?;
                // Cursor advance is last: it becomes observable only when
                // everything above committed.
                cursor_ops::update_delta_cursor(conn, session_id, transcript_path, new_offset)?;
                Ok(content_id)
            })
            .map_err(|e| {
                EngramError::Ingest(IngestError::Failed {
                    session_id: session_id.to_string(),
                    reason: e.to_string(),
                })
            })?;

        tracing::debug!(
            session_id,
            content_id,
            bytes = new_offset - current_offset,
            "delta ingested"
        );

        Ok(IngestOutcome::Ingested {
            content_id,
            bytes_read: new_offset - current_offset,
            project_path: project_path.map(str::to_string),
        })
    }
}

fn file_mtime(path: &Path) -> EngramResult<Option<DateTime<Utc>>> {
    if !path.exists() {
        return Ok(None);
    }
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(Some(DateTime::<Utc>::from(modified)))
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn empty_session_id_is_a_payload_error() {
        let store = Store::open_in_memory().unwrap();
        let ingester = Ingester::new(&store);
        let result = ingester.ingest("transcript", "", "/tmp/t.jsonl", None);
        assert!(matches!(
            result,
            Err(EngramError::Payload { field: "session_id" })
        ));
    }
}
