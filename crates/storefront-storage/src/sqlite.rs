//! SQLite implementation of [`StateStore`].
//!
//! [`SqliteStore`] persists key-value entries in a single `kv_entries`
//! table. Each write is a single upsert statement, so it is atomic on its
//! own; there is no multi-key transaction because the contract never needs
//! one.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::schema::{self, Location};
use crate::traits::StateStore;

/// SQLite-backed implementation of [`StateStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = schema::open(Location::File(path))?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = schema::open(Location::Memory)?;
        Ok(SqliteStore { conn })
    }

    /// Schema version of the open database.
    pub fn schema_version(&self) -> Result<usize, StorageError> {
        schema::schema_version(&self.conn)
    }

    /// Last-write timestamp of a key, as stored (RFC 3339, UTC).
    pub fn updated_at(&self, key: &str) -> Result<Option<String>, StorageError> {
        let ts = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ts)
    }
}

impl StateStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
