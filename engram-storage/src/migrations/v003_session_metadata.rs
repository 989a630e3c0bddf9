//! v003: session-metadata columns and the tool_calls table.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use super::add_column_if_missing;
use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    add_column_if_missing(conn, "content_items", "git_branch", "TEXT")?;
    add_column_if_missing(conn, "content_items", "cwd", "TEXT")?;
    add_column_if_missing(conn, "content_items", "host_version", "TEXT")?;
    add_column_if_missing(conn, "content_items", "thinking_level", "TEXT")?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tool_calls (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            content_item_id INTEGER NOT NULL REFERENCES content_items(id) ON DELETE CASCADE,
            tool_name       TEXT NOT NULL,
            tool_input      TEXT,
            tool_result     TEXT,
            is_error        INTEGER NOT NULL DEFAULT 0,
            timestamp       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_tool_calls_content ON tool_calls(content_item_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
