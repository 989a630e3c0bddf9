//! Schema bring-up and forward-only migration behavior.

use engram_storage::migrations::{self, SCHEMA_VERSION};
use engram_storage::Store;

#[test]
fn fresh_store_lands_on_current_version() {
    let store = Store::open_in_memory().unwrap();
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
}

#[test]
fn migrations_are_idempotent() {
    let store = Store::open_in_memory().unwrap();
    // Running the whole ladder again must be a no-op.
    store
        .pool()
        .writer
        .with_conn_sync(|conn| migrations::run_migrations(conn))
        .unwrap();
    store
        .pool()
        .writer
        .with_conn_sync(|conn| migrations::run_migrations(conn))
        .unwrap();
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
}

#[test]
fn all_expected_tables_exist() {
    let store = Store::open_in_memory().unwrap();
    let expected = [
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
        "content_fts",
    ];
    store
        .read(|conn| {
            for table in expected {
                let count: i64 = conn
                    .query_row(
                        "SELECT COUNT(*) FROM sqlite_master WHERE name = ?1",
                        [table],
                        |row| row.get(0),
                    )
                    .unwrap();
                assert!(count > 0, "missing table {table}");
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn reopening_a_file_store_preserves_data() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("memory.sqlite3");

    {
        let store = Store::open(&db_path).unwrap();
        store.find_or_create_entity("repo", "engram").unwrap();
    }

    let store = Store::open(&db_path).unwrap();
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    let entity = store.find_or_create_entity("repo", "engram").unwrap();
    let again = store.find_or_create_entity("repo", "engram").unwrap();
    assert_eq!(entity.id, again.id);
}
