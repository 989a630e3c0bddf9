//! Sweep statements and integrity helpers. Each mutation is a single
//! statement, atomic on its own.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::FactStatus;

use crate::to_storage_err;

/// Expire facts of `status` created before `cutoff`. Returns rows changed.
pub fn expire_facts_older_than(
    conn: &Connection,
    status: FactStatus,
    cutoff: DateTime<Utc>,
) -> EngramResult<usize> {
    let changed = conn
        .execute(
            "UPDATE facts SET status = 'expired'
             WHERE status = ?1 AND created_at < ?2",
            params![status.as_str(), cutoff.to_rfc3339()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed)
}

/// Delete provenance rows whose fact no longer exists.
pub fn delete_orphaned_provenance(conn: &Connection) -> EngramResult<usize> {
    let deleted = conn
        .execute(
            "DELETE FROM provenance
             WHERE fact_id NOT IN (SELECT id FROM facts)",
            [],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted)
}

/// Delete content older than `cutoff` that no provenance references.
/// Tool calls cascade with their content item.
pub fn delete_unreferenced_content(
    conn: &Connection,
    cutoff: DateTime<Utc>,
) -> EngramResult<usize> {
    let deleted = conn
        .execute(
            "DELETE FROM content_items
             WHERE ingested_at < ?1
               AND id NOT IN (
                   SELECT content_item_id FROM provenance
                   WHERE content_item_id IS NOT NULL
               )",
            params![cutoff.to_rfc3339()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted)
}

/// Orphan counts, for the validator.
pub fn count_orphans(conn: &Connection, table: &str, fk_column: &str, parent: &str) -> EngramResult<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {table}
         WHERE {fk_column} IS NOT NULL
           AND {fk_column} NOT IN (SELECT id FROM {parent})"
    );
    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Row count for one table.
pub fn table_count(conn: &Connection, table: &str) -> EngramResult<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// `PRAGMA integrity_check`; true when the engine reports "ok".
pub fn integrity_check(conn: &Connection) -> EngramResult<bool> {
    let result: String = conn
        .pragma_query_value(None, "integrity_check", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(result.eq_ignore_ascii_case("ok"))
}
