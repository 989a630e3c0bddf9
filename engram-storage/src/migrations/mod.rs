//! Forward-only schema migrations.
//!
//! `run_migrations` creates any missing base tables, then walks
//! `meta.schema_version` up to [`SCHEMA_VERSION`]. Each step runs inside one
//! transaction that ends by bumping the version row, so a partial migration
//! cannot be observed.

mod base;
mod helpers;
mod v002_project_scoping;
mod v003_session_metadata;
mod v004_fact_embeddings;
mod v005_source_mtime;
mod v006_operations_health;

use rusqlite::Connection;

use engram_core::errors::{EngramError, EngramResult, StorageError};

use crate::to_storage_err;

pub use helpers::{add_column_if_missing, column_exists, index_exists, table_exists};

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 6;

type MigrationFn = fn(&Connection) -> EngramResult<()>;

const MIGRATIONS: &[(u32, MigrationFn)] = &[
    (2, v002_project_scoping::migrate),
    (3, v003_session_metadata::migrate),
    (4, v004_fact_embeddings::migrate),
    (5, v005_source_mtime::migrate),
    (6, v006_operations_health::migrate),
];

/// Idempotent schema bring-up: base tables, then forward migrations.
pub fn run_migrations(conn: &Connection) -> EngramResult<()> {
    base::create_base_schema(conn)?;

    let current = schema_version(conn)?;
    if current > SCHEMA_VERSION {
        // A newer writer owns this file. Leave it alone; statements that
        // depend on columns we do not know about will surface their own
        // errors.
        tracing::warn!(
            found = current,
            supported = SCHEMA_VERSION,
            "store schema is newer than this build"
        );
        return Ok(());
    }

    for (version, migrate) in MIGRATIONS {
        if current < *version {
            apply(conn, *version, *migrate)?;
        }
    }
    Ok(())
}

/// Read `meta.schema_version`.
pub fn schema_version(conn: &Connection) -> EngramResult<u32> {
    let value: String = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    value
        .parse()
        .map_err(|e| to_storage_err(format!("unparseable schema_version '{value}': {e}")))
}

fn apply(conn: &Connection, version: u32, migrate: MigrationFn) -> EngramResult<()> {
    let tx = conn.unchecked_transaction().map_err(|e| {
        migration_failed(version, format!("begin: {e}"))
    })?;

    let result = migrate(&tx).and_then(|()| {
        tx.execute(
            "UPDATE meta SET value = ?1 WHERE key = 'schema_version'",
            [version.to_string()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(())
    });

    match result {
        Ok(()) => {
            tx.commit()
                .map_err(|e| migration_failed(version, format!("commit: {e}")))?;
            tracing::debug!(version, "schema migrated");
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(migration_failed(version, e.to_string()))
        }
    }
}

fn migration_failed(version: u32, reason: String) -> EngramError {
    EngramError::Storage(StorageError::MigrationFailed { version, reason })
}
