//! Content item upsert and lookups.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use engram_core::errors::EngramResult;
use engram_core::models::{ContentItem, NewContentItem};

use super::{parse_dt, parse_dt_opt, placeholders};
use crate::to_storage_err;

const COLUMNS: &str = "id, source, session_id, transcript_path, project_path, occurred_at,
                       ingested_at, text_hash, byte_len, raw_text, source_mtime, git_branch,
                       cwd, host_version, thinking_level, metadata_json";

/// Insert a content item, or refresh the existing row sharing the
/// `(text_hash, session_id)` fingerprint. Returns the row id either way.
pub fn upsert_content_item(conn: &Connection, item: &NewContentItem) -> EngramResult<i64> {
    conn.execute(
        "INSERT INTO content_items (
            source, session_id, transcript_path, project_path, occurred_at,
            text_hash, byte_len, raw_text, source_mtime, git_branch, cwd,
            host_version, thinking_level, metadata_json
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
         ON CONFLICT (text_hash, session_id) DO UPDATE SET
            transcript_path = excluded.transcript_path,
            project_path    = excluded.project_path,
            source_mtime    = excluded.source_mtime,
            git_branch      = excluded.git_branch,
            cwd             = excluded.cwd,
            host_version    = excluded.host_version,
            thinking_level  = excluded.thinking_level,
            metadata_json   = excluded.metadata_json",
        params![
            item.source,
            item.session_id,
            item.transcript_path,
            item.project_path,
            item.occurred_at.map(|t| t.to_rfc3339()),
            item.text_hash,
            item.byte_len,
            item.raw_text,
            item.source_mtime.map(|t| t.to_rfc3339()),
            item.git_branch,
            item.cwd,
            item.host_version,
            item.thinking_level,
            item.metadata_json,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    conn.query_row(
        "SELECT id FROM content_items WHERE text_hash = ?1 AND session_id IS ?2",
        params![item.text_hash, item.session_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_content_item(conn: &Connection, id: i64) -> EngramResult<Option<ContentItem>> {
    let result = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM content_items WHERE id = ?1"),
            params![id],
            |row| Ok(row_to_content_item(row)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Lookup by the incremental-sync key `(transcript_path, source_mtime)`.
pub fn content_item_by_transcript_and_mtime(
    conn: &Connection,
    transcript_path: &str,
    source_mtime: DateTime<Utc>,
) -> EngramResult<Option<ContentItem>> {
    let result = conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM content_items
                 WHERE transcript_path = ?1 AND source_mtime = ?2"
            ),
            params![transcript_path, source_mtime.to_rfc3339()],
            |row| Ok(row_to_content_item(row)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Batched lookup for detail projections.
pub fn content_items_by_ids(conn: &Connection, ids: &[i64]) -> EngramResult<Vec<ContentItem>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM content_items WHERE id IN ({})",
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok(row_to_content_item(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(items)
}

pub(crate) fn row_to_content_item(row: &rusqlite::Row<'_>) -> EngramResult<ContentItem> {
    let occurred_at: Option<String> = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let ingested_at: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let source_mtime: Option<String> = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(ContentItem {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        source: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        session_id: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        transcript_path: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        project_path: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        occurred_at: parse_dt_opt(occurred_at)?,
        ingested_at: parse_dt(&ingested_at)?,
        text_hash: row.get(7).map_err(|e| to_storage_err(e.to_string()))?,
        byte_len: row.get(8).map_err(|e| to_storage_err(e.to_string()))?,
        raw_text: row.get(9).map_err(|e| to_storage_err(e.to_string()))?,
        source_mtime: parse_dt_opt(source_mtime)?,
        git_branch: row.get(11).map_err(|e| to_storage_err(e.to_string()))?,
        cwd: row.get(12).map_err(|e| to_storage_err(e.to_string()))?,
        host_version: row.get(13).map_err(|e| to_storage_err(e.to_string()))?,
        thinking_level: row.get(14).map_err(|e| to_storage_err(e.to_string()))?,
        metadata_json: row.get(15).map_err(|e| to_storage_err(e.to_string()))?,
    })
}
