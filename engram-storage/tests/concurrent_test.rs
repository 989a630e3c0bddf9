//! Two writer classes sharing one store file, the way the RPC server and a
//! hook invocation do.

use std::sync::Arc;

use engram_core::models::NewFact;
use engram_storage::Store;

#[test]
fn concurrent_handles_on_one_file_all_commit() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("memory.sqlite3");

    let server = Arc::new(Store::open(&db_path).unwrap());
    let hook = Arc::new(Store::open(&db_path).unwrap());

    let mut handles = Vec::new();
    for (label, store) in [("server", server.clone()), ("hook", hook.clone())] {
        handles.push(std::thread::spawn(move || {
            for i in 0..20 {
                let entity = store
                    .find_or_create_entity("repo", &format!("{label}-{i}"))
                    .unwrap();
                store
                    .transaction_with_retry(|conn| {
                        let mut fact = NewFact::new(entity.id, "convention");
                        fact.object_literal = Some(format!("value-{i}"));
                        engram_storage::queries::fact_ops::insert_fact(conn, &fact)?;
                        Ok(())
                    })
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().expect("writer should not panic");
    }

    let count = server
        .read(|conn| {
            conn.query_row("SELECT COUNT(*) FROM facts", [], |row| row.get::<_, i64>(0))
                .map_err(|_| engram_core::EngramError::Payload { field: "count" })
        })
        .unwrap();
    assert_eq!(count, 40);
}
