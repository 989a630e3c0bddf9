//! v005: source file mtime for the incremental-sync gate.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use super::add_column_if_missing;
use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    add_column_if_missing(conn, "content_items", "source_mtime", "TEXT")?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_content_transcript_mtime
             ON content_items(transcript_path, source_mtime);",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
