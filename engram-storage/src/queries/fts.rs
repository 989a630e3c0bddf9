//! FTS5 full-text index over sanitized content.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::ContentItem;

use super::content_ops::row_to_content_item;
use crate::to_storage_err;

/// Index one content item's sanitized text. Runs inside the ingestion
/// transaction.
pub fn index_content(conn: &Connection, content_id: i64, text: &str) -> EngramResult<()> {
    // Replace any previous index row for this content id (re-ingested
    // fingerprints collapse onto one row).
    conn.execute(
        "DELETE FROM content_fts WHERE content_id = ?1",
        params![content_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO content_fts (text, content_id) VALUES (?1, ?2)",
        params![text, content_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Drop index rows whose content item no longer exists.
pub fn prune_index(conn: &Connection) -> EngramResult<usize> {
    let deleted = conn
        .execute(
            "DELETE FROM content_fts
             WHERE content_id NOT IN (SELECT id FROM content_items)",
            [],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted)
}

/// BM25-ranked lexical search. An empty query returns no results.
pub fn search_content(
    conn: &Connection,
    query: &str,
    limit: usize,
) -> EngramResult<Vec<ContentItem>> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.source, c.session_id, c.transcript_path, c.project_path,
                    c.occurred_at, c.ingested_at, c.text_hash, c.byte_len, c.raw_text,
                    c.source_mtime, c.git_branch, c.cwd, c.host_version, c.thinking_level,
                    c.metadata_json
             FROM content_fts fts
             JOIN content_items c ON c.id = fts.content_id
             WHERE content_fts MATCH ?1
             ORDER BY rank
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![fts_quote(query), limit as i64], |row| {
            Ok(row_to_content_item(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

/// Quote each term so user input never reaches the FTS query parser as
/// syntax.
fn fts_quote(query: &str) -> String {
    query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}
