//! Typed fact-to-fact links.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::FactLink;

use crate::to_storage_err;

/// Insert a link; duplicates are ignored.
pub fn insert_fact_link(
    conn: &Connection,
    from_fact_id: i64,
    to_fact_id: i64,
    link_type: &str,
) -> EngramResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO fact_links (from_fact_id, to_fact_id, link_type)
         VALUES (?1, ?2, ?3)",
        params![from_fact_id, to_fact_id, link_type],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn links_from_fact(conn: &Connection, from_fact_id: i64) -> EngramResult<Vec<FactLink>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, from_fact_id, to_fact_id, link_type
             FROM fact_links WHERE from_fact_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![from_fact_id], |row| {
            Ok(FactLink {
                id: row.get(0)?,
                from_fact_id: row.get(1)?,
                to_fact_id: row.get(2)?,
                link_type: row.get(3)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
