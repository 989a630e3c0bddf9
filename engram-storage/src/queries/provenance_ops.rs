//! Provenance evidence rows.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::{NewProvenance, Provenance, ProvenanceStrength};

use super::placeholders;
use crate::to_storage_err;

pub fn insert_provenance(conn: &Connection, provenance: &NewProvenance) -> EngramResult<i64> {
    conn.execute(
        "INSERT INTO provenance (fact_id, content_item_id, quote, attribution_entity_id, strength)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            provenance.fact_id,
            provenance.content_item_id,
            provenance.quote,
            provenance.attribution_entity_id,
            provenance.strength.as_str(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn provenance_for_fact(conn: &Connection, fact_id: i64) -> EngramResult<Vec<Provenance>> {
    provenance_for_facts(conn, &[fact_id])
}

/// One batched query for any number of facts.
pub fn provenance_for_facts(conn: &Connection, fact_ids: &[i64]) -> EngramResult<Vec<Provenance>> {
    if fact_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, fact_id, content_item_id, quote, attribution_entity_id, strength
         FROM provenance WHERE fact_id IN ({})",
        placeholders(fact_ids.len())
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(fact_ids.iter()), |row| {
            Ok(row_to_provenance(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(result)
}

fn row_to_provenance(row: &rusqlite::Row<'_>) -> EngramResult<Provenance> {
    let strength_str: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    Ok(Provenance {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        fact_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        content_item_id: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        quote: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        attribution_entity_id: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        strength: ProvenanceStrength::parse(&strength_str)
            .ok_or_else(|| to_storage_err(format!("unknown strength '{strength_str}'")))?,
    })
}
