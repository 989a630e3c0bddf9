//! v002: project scoping columns on content_items and facts.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use super::add_column_if_missing;
use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    add_column_if_missing(conn, "content_items", "project_path", "TEXT")?;
    add_column_if_missing(conn, "facts", "scope", "TEXT NOT NULL DEFAULT 'project'")?;
    add_column_if_missing(conn, "facts", "project_path", "TEXT")?;

    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_facts_scope ON facts(scope);
        CREATE INDEX IF NOT EXISTS idx_facts_project ON facts(project_path);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
