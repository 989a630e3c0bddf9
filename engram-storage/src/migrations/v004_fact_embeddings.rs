//! v004: stored fact embeddings.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use super::add_column_if_missing;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    add_column_if_missing(conn, "facts", "embedding_json", "TEXT")
}
