//! The [`StateStore`] trait defining the storage contract for client state.
//!
//! The contract is a flat string-keyed map of JSON documents, the same
//! shape as browser local storage. Higher-level helpers in
//! [`crate::envelope`] and [`crate::catalog`] build typed, versioned
//! records on top of these primitives.
//!
//! All backends (InMemoryStore, SqliteStore) implement this trait, so a
//! cart can be moved between them without touching its logic.

use crate::error::StorageError;

/// The storage contract for persisted client state.
///
/// The trait is synchronous: every write completes before the call
/// returns, and there is exactly one writer.
pub trait StateStore {
    /// Reads the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Lists all stored keys in ascending order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// True when a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}
