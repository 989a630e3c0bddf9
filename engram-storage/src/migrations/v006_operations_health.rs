//! v006: operation_progress and schema_health tables.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS operation_progress (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            operation_type  TEXT NOT NULL,
            scope           TEXT NOT NULL DEFAULT '',
            status          TEXT NOT NULL DEFAULT 'running',
            total_items     INTEGER NOT NULL DEFAULT 0,
            processed_items INTEGER NOT NULL DEFAULT 0,
            checkpoint_data TEXT,
            started_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            completed_at    TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_operation_status ON operation_progress(status);

        CREATE TABLE IF NOT EXISTS schema_health (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            checked_at         TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            schema_version     INTEGER NOT NULL,
            validation_status  TEXT NOT NULL,
            issues_json        TEXT NOT NULL DEFAULT '[]',
            table_counts_json  TEXT NOT NULL DEFAULT '{}'
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
