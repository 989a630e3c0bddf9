//! Introspection helpers that keep ALTER-based migrations idempotent.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn table_exists(conn: &Connection, table: &str) -> EngramResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count > 0)
}

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> EngramResult<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut rows = stmt
        .query([])
        .map_err(|e| to_storage_err(e.to_string()))?;
    while let Some(row) = rows.next().map_err(|e| to_storage_err(e.to_string()))? {
        let name: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn index_exists(conn: &Connection, index: &str) -> EngramResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1",
            [index],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count > 0)
}

/// `ALTER TABLE … ADD COLUMN` only when the column is absent.
pub fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> EngramResult<()> {
    if !column_exists(conn, table, column)? {
        conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"))
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}
