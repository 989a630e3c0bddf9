//! Append-only schema health log.

use rusqlite::{params, Connection, OptionalExtension};

use engram_core::errors::EngramResult;
use engram_core::models::{SchemaHealth, ValidationStatus};

use super::parse_dt;
use crate::to_storage_err;

pub fn record_schema_health(
    conn: &Connection,
    schema_version: i64,
    status: ValidationStatus,
    issues_json: &str,
    table_counts_json: &str,
) -> EngramResult<i64> {
    conn.execute(
        "INSERT INTO schema_health (schema_version, validation_status, issues_json,
                                    table_counts_json)
         VALUES (?1, ?2, ?3, ?4)",
        params![schema_version, status.as_str(), issues_json, table_counts_json],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn latest_schema_health(conn: &Connection) -> EngramResult<Option<SchemaHealth>> {
    let result = conn
        .query_row(
            "SELECT id, checked_at, schema_version, validation_status, issues_json,
                    table_counts_json
             FROM schema_health ORDER BY id DESC LIMIT 1",
            [],
            |row| {
                let checked_at: String = row.get(1)?;
                let status_str: String = row.get(3)?;
                Ok((
                    row.get::<_, i64>(0)?,
                    checked_at,
                    row.get::<_, i64>(2)?,
                    status_str,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((id, checked_at, schema_version, status_str, issues_json, table_counts_json)) = result
    else {
        return Ok(None);
    };
    Ok(Some(SchemaHealth {
        id,
        checked_at: parse_dt(&checked_at)?,
        schema_version,
        validation_status: ValidationStatus::parse(&status_str)
            .ok_or_else(|| to_storage_err(format!("unknown validation status '{status_str}'")))?,
        issues_json,
        table_counts_json,
    }))
}
