//! Fact insertion, truth-maintenance updates, and slot queries.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use engram_core::errors::EngramResult;
use engram_core::models::{Fact, FactStatus, NewFact, Polarity, Scope};

use super::{parse_dt, parse_dt_opt, placeholders};
use crate::to_storage_err;

const COLUMNS: &str = "id, subject_entity_id, predicate, object_entity_id, object_literal,
                       datatype, polarity, valid_from, valid_to, status, confidence,
                       created_from, created_at, scope, project_path, embedding_json";

pub fn insert_fact(conn: &Connection, fact: &NewFact) -> EngramResult<i64> {
    // A global fact never carries a project path.
    let project_path = match fact.scope {
        Scope::Global => None,
        Scope::Project => fact.project_path.as_deref(),
    };

    conn.execute(
        "INSERT INTO facts (
            subject_entity_id, predicate, object_entity_id, object_literal, datatype,
            polarity, valid_from, valid_to, status, confidence, created_from,
            scope, project_path, embedding_json
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            fact.subject_entity_id,
            fact.predicate,
            fact.object_entity_id,
            fact.object_literal,
            fact.datatype,
            fact.polarity.as_str(),
            fact.valid_from.to_rfc3339(),
            fact.status.as_str(),
            fact.confidence.clamp(0.0, 1.0),
            fact.created_from,
            fact.scope.as_str(),
            project_path,
            fact.embedding_json,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_fact(conn: &Connection, id: i64) -> EngramResult<Option<Fact>> {
    let result = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM facts WHERE id = ?1"),
            params![id],
            |row| Ok(row_to_fact(row)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Facts in a `(subject, predicate)` slot with the given status.
pub fn facts_for_slot(
    conn: &Connection,
    subject_entity_id: i64,
    predicate: &str,
    status: FactStatus,
) -> EngramResult<Vec<Fact>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM facts
             WHERE subject_entity_id = ?1 AND predicate = ?2 AND status = ?3
             ORDER BY created_at"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![subject_entity_id, predicate, status.as_str()], |row| {
            Ok(row_to_fact(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_facts(rows)
}

/// Transition a fact's truth-maintenance status, optionally closing its
/// validity interval.
pub fn update_fact_status(
    conn: &Connection,
    id: i64,
    status: FactStatus,
    valid_to: Option<DateTime<Utc>>,
) -> EngramResult<()> {
    conn.execute(
        "UPDATE facts SET status = ?2, valid_to = COALESCE(?3, valid_to) WHERE id = ?1",
        params![id, status.as_str(), valid_to.map(|t| t.to_rfc3339())],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn update_fact_scope(
    conn: &Connection,
    id: i64,
    scope: Scope,
    project_path: Option<&str>,
) -> EngramResult<()> {
    let project_path = match scope {
        Scope::Global => None,
        Scope::Project => project_path,
    };
    conn.execute(
        "UPDATE facts SET scope = ?2, project_path = ?3 WHERE id = ?1",
        params![id, scope.as_str(), project_path],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn update_fact_embedding(conn: &Connection, id: i64, embedding_json: &str) -> EngramResult<()> {
    conn.execute(
        "UPDATE facts SET embedding_json = ?2 WHERE id = ?1",
        params![id, embedding_json],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Facts carrying an embedding, oldest first, for ranking or backfill.
pub fn facts_with_embeddings(conn: &Connection, limit: usize) -> EngramResult<Vec<Fact>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM facts
             WHERE embedding_json IS NOT NULL
             ORDER BY id
             LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_fact(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_facts(rows)
}

/// Most recently created facts, for recall projections.
pub fn recent_facts(conn: &Connection, limit: usize) -> EngramResult<Vec<Fact>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM facts
             ORDER BY created_at DESC, id DESC
             LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_fact(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_facts(rows)
}

/// Batched lookup for detail projections.
pub fn facts_by_ids(conn: &Connection, ids: &[i64]) -> EngramResult<Vec<Fact>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM facts WHERE id IN ({})",
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok(row_to_fact(row))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_facts(rows)
}

fn collect_facts(
    rows: impl Iterator<Item = rusqlite::Result<EngramResult<Fact>>>,
) -> EngramResult<Vec<Fact>> {
    let mut facts = Vec::new();
    for row in rows {
        facts.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(facts)
}

pub(crate) fn row_to_fact(row: &rusqlite::Row<'_>) -> EngramResult<Fact> {
    let polarity_str: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_from: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_to: Option<String> = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let status_str: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at: String = row.get(12).map_err(|e| to_storage_err(e.to_string()))?;
    let scope_str: String = row.get(13).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(Fact {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        subject_entity_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        predicate: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        object_entity_id: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        object_literal: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        datatype: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        polarity: Polarity::parse(&polarity_str)
            .ok_or_else(|| to_storage_err(format!("unknown polarity '{polarity_str}'")))?,
        valid_from: parse_dt(&valid_from)?,
        valid_to: parse_dt_opt(valid_to)?,
        status: FactStatus::parse(&status_str)
            .ok_or_else(|| to_storage_err(format!("unknown fact status '{status_str}'")))?,
        confidence: row.get(10).map_err(|e| to_storage_err(e.to_string()))?,
        created_from: row.get(11).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_dt(&created_at)?,
        scope: Scope::parse(&scope_str)
            .ok_or_else(|| to_storage_err(format!("unknown scope '{scope_str}'")))?,
        project_path: row.get(14).map_err(|e| to_storage_err(e.to_string()))?,
        embedding_json: row.get(15).map_err(|e| to_storage_err(e.to_string()))?,
    })
}
