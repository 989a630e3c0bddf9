//! Entity dedup by slug, plus aliases.

use rusqlite::{params, Connection, OptionalExtension};

use engram_core::errors::EngramResult;
use engram_core::models::{slug_for, Entity};

use super::{parse_dt, placeholders};
use crate::to_storage_err;

/// Find an entity by slug, creating it when absent. The slug computed from
/// `(entity_type, name)` is the dedup key; insertion races collapse onto
/// the surviving row.
pub fn find_or_create_entity(
    conn: &Connection,
    entity_type: &str,
    canonical_name: &str,
) -> EngramResult<Entity> {
    let slug = slug_for(entity_type, canonical_name);

    conn.execute(
        "INSERT OR IGNORE INTO entities (type, canonical_name, slug) VALUES (?1, ?2, ?3)",
        params![entity_type, canonical_name, slug],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    entity_by_slug(conn, &slug)?
        .ok_or_else(|| to_storage_err(format!("entity vanished after upsert: {slug}")))
}

pub fn entity_by_slug(conn: &Connection, slug: &str) -> EngramResult<Option<Entity>> {
    let result = conn
        .query_row(
            "SELECT id, type, canonical_name, slug, created_at FROM entities WHERE slug = ?1",
            params![slug],
            |row| Ok(row_to_entity(row)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

pub fn get_entity(conn: &Connection, id: i64) -> EngramResult<Option<Entity>> {
    let result = conn
        .query_row(
            "SELECT id, type, canonical_name, slug, created_at FROM entities WHERE id = ?1",
            params![id],
            |row| Ok(row_to_entity(row)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Batched lookup for detail projections.
pub fn entities_by_ids(conn: &Connection, ids: &[i64]) -> EngramResult<Vec<Entity>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, type, canonical_name, slug, created_at
         FROM entities WHERE id IN ({})",
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok(row_to_entity(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entities = Vec::new();
    for row in rows {
        entities.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(entities)
}

/// Record an alternative surface form. Duplicate aliases are ignored.
pub fn add_alias(
    conn: &Connection,
    entity_id: i64,
    alias: &str,
    source: Option<&str>,
    confidence: f64,
) -> EngramResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO entity_aliases (entity_id, alias, source, confidence)
         VALUES (?1, ?2, ?3, ?4)",
        params![entity_id, alias, source, confidence.clamp(0.0, 1.0)],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

fn row_to_entity(row: &rusqlite::Row<'_>) -> EngramResult<Entity> {
    let created_at: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    Ok(Entity {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        entity_type: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        canonical_name: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        slug: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_dt(&created_at)?,
    })
}
