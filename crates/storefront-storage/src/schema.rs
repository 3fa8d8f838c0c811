//! Database setup for the SQLite backend.
//!
//! The schema is one key-value table. Its version is tracked in SQLite's
//! `user_version` pragma by `rusqlite_migration`; migration files are
//! embedded with `include_str!`.

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

/// Where a store's database lives.
#[derive(Debug, Clone, Copy)]
pub enum Location<'a> {
    /// A database file, created if missing.
    File(&'a str),
    /// A private in-memory database, gone when the connection drops.
    Memory,
}

/// Migration scripts, oldest first.
const MIGRATIONS: &[&str] = &[include_str!("migrations/001_initial_schema.sql")];

fn migrations() -> Migrations<'static> {
    Migrations::new(MIGRATIONS.iter().copied().map(M::up).collect())
}

/// Schema version of a fully migrated database.
pub fn latest_version() -> usize {
    MIGRATIONS.len()
}

/// Opens the database and brings its schema up to date.
///
/// File databases run in WAL mode; the pragma is ignored for in-memory
/// ones.
pub fn open(location: Location<'_>) -> Result<Connection, StorageError> {
    let mut conn = match location {
        Location::File(path) => Connection::open(path)?,
        Location::Memory => Connection::open_in_memory()?,
    };
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    migrations()
        .to_latest(&mut conn)
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    Ok(conn)
}

/// Schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> Result<usize, StorageError> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(usize::try_from(version).unwrap_or(0))
}
