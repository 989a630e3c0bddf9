//! Unresolved contradictions.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::{Conflict, ConflictStatus};

use super::parse_dt;
use crate::to_storage_err;

pub fn insert_conflict(
    conn: &Connection,
    fact_a_id: i64,
    fact_b_id: i64,
    notes: Option<&str>,
) -> EngramResult<i64> {
    conn.execute(
        "INSERT INTO conflicts (fact_a_id, fact_b_id, status, notes)
         VALUES (?1, ?2, 'open', ?3)",
        params![fact_a_id, fact_b_id, notes],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn open_conflicts(conn: &Connection) -> EngramResult<Vec<Conflict>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, fact_a_id, fact_b_id, status, detected_at, notes
             FROM conflicts WHERE status = 'open' ORDER BY detected_at",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(row_to_conflict(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut conflicts = Vec::new();
    for row in rows {
        conflicts.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(conflicts)
}

pub fn resolve_conflict(conn: &Connection, id: i64) -> EngramResult<()> {
    conn.execute(
        "UPDATE conflicts SET status = 'resolved' WHERE id = ?1",
        params![id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

fn row_to_conflict(row: &rusqlite::Row<'_>) -> EngramResult<Conflict> {
    let status_str: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let detected_at: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    Ok(Conflict {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        fact_a_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        fact_b_id: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        status: ConflictStatus::parse(&status_str)
            .ok_or_else(|| to_storage_err(format!("unknown conflict status '{status_str}'")))?,
        detected_at: parse_dt(&detected_at)?,
        notes: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
    })
}
