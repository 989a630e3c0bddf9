//! Store location configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Relative location of a memory database inside its root directory.
pub const DB_RELATIVE_PATH: &str = ".claude/memory.sqlite3";

/// Where the global and project databases live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Override for the global database path. When unset, the global store
    /// lives at `$HOME/.claude/memory.sqlite3`.
    pub global_db_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Database path for a project rooted at `project_path`.
    pub fn project_db_path(project_path: &std::path::Path) -> PathBuf {
        project_path.join(DB_RELATIVE_PATH)
    }
}
