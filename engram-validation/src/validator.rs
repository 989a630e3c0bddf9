//! The integrity audit.
//!
//! Every run produces a list of findings, appends a schema_health row, and
//! reports `valid` when no finding is an error. Nothing is auto-healed:
//! orphans belong to the sweeper, and structural damage belongs to a human.

use rusqlite::Connection;
use serde_json::json;

use engram_core::constants::EMBEDDING_DIM;
use engram_core::errors::EngramResult;
use engram_core::models::{
    FactStatus, OperationStatus, Scope, Severity, ValidationIssue, ValidationStatus,
};
use engram_storage::migrations;
use engram_storage::queries::{health_ops, maintenance};
use engram_storage::Store;

/// Outcome of one validator run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// True when no issue is an error.
    pub valid: bool,
    pub status: ValidationStatus,
    pub issues: Vec<ValidationIssue>,
}

/// Tables that must exist. `content_fts` is optional: a store without the
/// lexical index still validates.
const EXPECTED_TABLES: &[&str] = &[
    "meta",
    "content_items",
    "delta_cursors",
    "entities",
    "entity_aliases",
    "facts",
    "provenance",
    "fact_links",
    "conflicts",
    "tool_calls",
    "operation_progress",
    "schema_health",
];

/// Critical columns, per table.
const CRITICAL_COLUMNS: &[(&str, &[&str])] = &[
    ("content_items", &["text_hash", "byte_len", "session_id", "source_mtime"]),
    ("delta_cursors", &["session_id", "transcript_path", "last_byte_offset"]),
    ("entities", &["type", "canonical_name", "slug"]),
    ("facts", &["subject_entity_id", "predicate", "status", "scope", "confidence", "embedding_json"]),
    ("provenance", &["fact_id", "strength"]),
    ("conflicts", &["fact_a_id", "fact_b_id", "status"]),
    ("operation_progress", &["operation_type", "status", "started_at"]),
    ("schema_health", &["validation_status", "issues_json"]),
];

/// Critical indexes. Missing ones degrade queries but break nothing.
const CRITICAL_INDEXES: &[&str] = &[
    "idx_facts_slot",
    "idx_facts_scope",
    "idx_facts_project",
    "idx_provenance_fact",
    "idx_content_transcript_mtime",
];

/// Referential orphan checks: (child table, fk column, parent table).
const ORPHAN_CHECKS: &[(&str, &str, &str)] = &[
    ("provenance", "fact_id", "facts"),
    ("fact_links", "from_fact_id", "facts"),
    ("fact_links", "to_fact_id", "facts"),
    ("tool_calls", "content_item_id", "content_items"),
];

/// Run every check, append a schema_health row, and report.
pub fn validate(store: &Store) -> EngramResult<ValidationReport> {
    let issues = store.read(collect_issues)?;

    let has_error = issues.iter().any(|i| i.severity == Severity::Error);
    let has_warning = issues.iter().any(|i| i.severity == Severity::Warning);
    let status = if has_error {
        ValidationStatus::Corrupt
    } else if has_warning {
        ValidationStatus::Degraded
    } else {
        ValidationStatus::Healthy
    };

    let schema_version = store.schema_version()?;
    let issues_json = serde_json::to_string(&issues)?;
    let table_counts_json = store.read(table_counts)?;
    store.transaction(|conn| {
        health_ops::record_schema_health(
            conn,
            schema_version as i64,
            status,
            &issues_json,
            &table_counts_json,
        )
    })?;

    for issue in &issues {
        match issue.severity {
            Severity::Error => tracing::error!(message = %issue.message, "validation error"),
            Severity::Warning => tracing::warn!(message = %issue.message, "validation warning"),
        }
    }

    Ok(ValidationReport {
        valid: !has_error,
        status,
        issues,
    })
}

fn collect_issues(conn: &Connection) -> EngramResult<Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // Structure: tables, columns, indexes.
    for table in EXPECTED_TABLES {
        if !migrations::table_exists(conn, table)? {
            issues.push(ValidationIssue::error(format!("missing table {table}")));
        }
    }
    for (table, columns) in CRITICAL_COLUMNS {
        if !migrations::table_exists(conn, table)? {
            continue; // already reported above
        }
        for column in *columns {
            if !migrations::column_exists(conn, table, column)? {
                issues.push(ValidationIssue::error(format!(
                    "missing column {table}.{column}"
                )));
            }
        }
    }
    for index in CRITICAL_INDEXES {
        if !migrations::index_exists(conn, index)? {
            issues.push(ValidationIssue::warning(format!("missing index {index}")));
        }
    }

    // Referential orphans. The sweeper heals these; their presence degrades.
    for (table, fk_column, parent) in ORPHAN_CHECKS {
        if !migrations::table_exists(conn, table)? {
            continue;
        }
        let orphans = maintenance::count_orphans(conn, table, fk_column, parent)?;
        if orphans > 0 {
            issues.push(ValidationIssue::warning(format!(
                "{orphans} orphaned rows in {table} via {fk_column}"
            )));
        }
    }

    // Value domains.
    check_fact_domains(conn, &mut issues)?;
    check_operation_domains(conn, &mut issues)?;
    check_embedding_sample(conn, &mut issues)?;

    Ok(issues)
}

fn check_fact_domains(conn: &Connection, issues: &mut Vec<ValidationIssue>) -> EngramResult<()> {
    let mut stmt = conn
        .prepare("SELECT status, scope, COUNT(*) FROM facts GROUP BY status, scope")
        .map_err(storage_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })
        .map_err(storage_err)?;

    for row in rows {
        let (status, scope, count) = row.map_err(storage_err)?;
        match FactStatus::parse(&status) {
            None => issues.push(ValidationIssue::error(format!(
                "{count} facts with unknown status '{status}'"
            ))),
            Some(FactStatus::Active) | Some(FactStatus::Superseded) => {}
            Some(_) => issues.push(ValidationIssue::warning(format!(
                "{count} facts in transitional status '{status}'"
            ))),
        }
        if Scope::parse(&scope).is_none() {
            issues.push(ValidationIssue::error(format!(
                "{count} facts with unknown scope '{scope}'"
            )));
        }
    }
    Ok(())
}

fn check_operation_domains(
    conn: &Connection,
    issues: &mut Vec<ValidationIssue>,
) -> EngramResult<()> {
    let mut stmt = conn
        .prepare("SELECT status, COUNT(*) FROM operation_progress GROUP BY status")
        .map_err(storage_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .map_err(storage_err)?;

    for row in rows {
        let (status, count) = row.map_err(storage_err)?;
        if OperationStatus::parse(&status).is_none() {
            issues.push(ValidationIssue::error(format!(
                "{count} operations with unknown status '{status}'"
            )));
        }
    }
    Ok(())
}

/// Sample the first 10 stored embeddings and check their dimension.
fn check_embedding_sample(
    conn: &Connection,
    issues: &mut Vec<ValidationIssue>,
) -> EngramResult<()> {
    let mut stmt = conn
        .prepare(
            "SELECT id, embedding_json FROM facts
             WHERE embedding_json IS NOT NULL ORDER BY id LIMIT 10",
        )
        .map_err(storage_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))
        .map_err(storage_err)?;

    for row in rows {
        let (id, json) = row.map_err(storage_err)?;
        match serde_json::from_str::<Vec<f32>>(&json) {
            Ok(vector) if vector.len() == EMBEDDING_DIM => {}
            Ok(vector) => issues.push(ValidationIssue::error(format!(
                "fact {id} embedding has {} dimensions, expected {EMBEDDING_DIM}",
                vector.len()
            ))),
            Err(_) => issues.push(ValidationIssue::error(format!(
                "fact {id} embedding is not a float array"
            ))),
        }
    }
    Ok(())
}

fn table_counts(conn: &Connection) -> EngramResult<String> {
    let mut counts = serde_json::Map::new();
    for table in EXPECTED_TABLES {
        if migrations::table_exists(conn, table)? {
            counts.insert(
                table.to_string(),
                json!(maintenance::table_count(conn, table)?),
            );
        }
    }
    Ok(serde_json::Value::Object(counts).to_string())
}

fn storage_err(e: rusqlite::Error) -> engram_core::EngramError {
    engram_core::EngramError::Storage(engram_core::errors::StorageError::Sqlite {
        message: e.to_string(),
    })
}
