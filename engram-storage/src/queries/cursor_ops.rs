//! Delta cursor reads and monotonic advancement.

use rusqlite::{params, Connection, OptionalExtension};

use engram_core::errors::EngramResult;

use crate::to_storage_err;

/// Saved byte offset for a transcript, 0 when none exists.
pub fn get_delta_cursor(
    conn: &Connection,
    session_id: &str,
    transcript_path: &str,
) -> EngramResult<u64> {
    let offset: Option<i64> = conn
        .query_row(
            "SELECT last_byte_offset FROM delta_cursors
             WHERE session_id = ?1 AND transcript_path = ?2",
            params![session_id, transcript_path],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(offset.unwrap_or(0).max(0) as u64)
}

/// Upsert the cursor. The offset never decreases: a stale writer losing a
/// race cannot rewind a later cursor.
pub fn update_delta_cursor(
    conn: &Connection,
    session_id: &str,
    transcript_path: &str,
    offset: u64,
) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO delta_cursors (session_id, transcript_path, last_byte_offset, updated_at)
         VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
         ON CONFLICT (session_id, transcript_path) DO UPDATE SET
            last_byte_offset = MAX(last_byte_offset, excluded.last_byte_offset),
            updated_at = excluded.updated_at",
        params![session_id, transcript_path, offset as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
