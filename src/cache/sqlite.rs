//! SQLite-backed persistent cache.

use super::{CacheError, CacheResult, LocalCache};
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entries (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

/// Key-value cache stored in a single SQLite table.
///
/// Every write is committed immediately, so the file always reflects the
/// last completed mutation.
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens an in-memory cache with the entries schema.
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens or creates a cache database at the given path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Returns every stored key, sorted.
    pub fn keys(&self) -> CacheResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM entries ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl LocalCache for SqliteCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> CacheResult<()> {
        self.conn.execute(
            "INSERT INTO entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CacheResult<()> {
        self.conn
            .execute("DELETE FROM entries WHERE key = ?1", params![key])?;
        Ok(())
    }
}
