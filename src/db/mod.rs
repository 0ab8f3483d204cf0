//! SQLite-backed product catalog
//!
//! The catalog is the source of truth the alternatives generator reconciles
//! AI-suggested tool names against. Only approved entries are eligible.

mod catalog;
mod schema;
mod seed;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub use seed::STARTER_CATALOG;

/// Wrapper around the SQLite connection
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Open (or create) the catalog database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database for tests
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }
}
