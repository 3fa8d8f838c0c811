//! In-memory implementation of [`StateStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! sessions. It has identical semantics to the SQLite backend; nothing
//! survives the process.

use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::traits::StateStore;

/// In-memory implementation of [`StateStore`].
///
/// Keys are kept in a `BTreeMap` so [`StateStore::keys`] is ordered without
/// a sort.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: BTreeMap<String, String>,
    writes: u64,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls since creation.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert!(store.contains("a").unwrap());

        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.write_count(), 2);

        store.remove("a").unwrap();
        assert!(!store.contains("a").unwrap());
        // Removing again is a no-op.
        store.remove("a").unwrap();
    }

    #[test]
    fn test_keys_sorted() {
        let mut store = InMemoryStore::new();
        store.set("cart-storage", "{}").unwrap();
        store.set("admin_variants", "[]").unwrap();
        store.set("admin_products", "[]").unwrap();
        assert_eq!(
            store.keys().unwrap(),
            vec!["admin_products", "admin_variants", "cart-storage"]
        );
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn StateStore> = Box::new(InMemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
