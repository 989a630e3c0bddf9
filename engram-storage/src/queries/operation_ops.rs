//! Long-running operation progress rows.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::{OperationProgress, OperationStatus};

use super::{parse_dt, parse_dt_opt};
use crate::to_storage_err;

const COLUMNS: &str = "id, operation_type, scope, status, total_items, processed_items,
                       checkpoint_data, started_at, completed_at";

pub fn start_operation(
    conn: &Connection,
    operation_type: &str,
    scope: &str,
    total_items: i64,
) -> EngramResult<i64> {
    conn.execute(
        "INSERT INTO operation_progress (operation_type, scope, status, total_items)
         VALUES (?1, ?2, 'running', ?3)",
        params![operation_type, scope, total_items],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn update_progress(
    conn: &Connection,
    id: i64,
    processed_items: i64,
    checkpoint_data: Option<&str>,
) -> EngramResult<()> {
    conn.execute(
        "UPDATE operation_progress
         SET processed_items = ?2, checkpoint_data = COALESCE(?3, checkpoint_data)
         WHERE id = ?1",
        params![id, processed_items, checkpoint_data],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn finish_operation(conn: &Connection, id: i64, status: OperationStatus) -> EngramResult<()> {
    conn.execute(
        "UPDATE operation_progress
         SET status = ?2, completed_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE id = ?1",
        params![id, status.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// `running` rows started before `cutoff`: writers that crashed mid-flight.
pub fn stuck_operations(
    conn: &Connection,
    cutoff: DateTime<Utc>,
) -> EngramResult<Vec<OperationProgress>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM operation_progress
             WHERE status = 'running' AND started_at < ?1
             ORDER BY started_at"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![cutoff.to_rfc3339()], |row| Ok(row_to_operation(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut operations = Vec::new();
    for row in rows {
        operations.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(operations)
}

/// Reset stuck rows to `failed` so new runs may start. Returns rows changed.
pub fn reset_stuck_operations(conn: &Connection, cutoff: DateTime<Utc>) -> EngramResult<usize> {
    let changed = conn
        .execute(
            "UPDATE operation_progress
             SET status = 'failed', completed_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE status = 'running' AND started_at < ?1",
            params![cutoff.to_rfc3339()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed)
}

fn row_to_operation(row: &rusqlite::Row<'_>) -> EngramResult<OperationProgress> {
    let status_str: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let started_at: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let completed_at: Option<String> = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    Ok(OperationProgress {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        operation_type: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        scope: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        status: OperationStatus::parse(&status_str)
            .ok_or_else(|| to_storage_err(format!("unknown operation status '{status_str}'")))?,
        total_items: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        processed_items: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        checkpoint_data: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        started_at: parse_dt(&started_at)?,
        completed_at: parse_dt_opt(completed_at)?,
    })
}
