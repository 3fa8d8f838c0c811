//! Versioned JSON envelopes.
//!
//! A persisted blob is stored as `{ "state": <T>, "version": <u32> }`.
//! Readers declare the newest version they understand plus a migration hook
//! for older ones; blobs written by a newer build are refused rather than
//! half-read.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::traits::StateStore;

/// On-disk wrapper around a persisted state value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

/// Envelope with the state left as raw JSON, for migration.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    state: serde_json::Value,
    #[serde(default)]
    version: u32,
}

/// Serializes `state` at `version` and writes it under `key`.
pub fn save_versioned<S, T>(
    store: &mut S,
    key: &str,
    version: u32,
    state: &T,
) -> Result<(), StorageError>
where
    S: StateStore + ?Sized,
    T: Serialize,
{
    let json = serde_json::to_string(&Envelope { state, version })?;
    store.set(key, &json)
}

/// Reads the envelope under `key` and decodes its state.
///
/// Returns `Ok(None)` when the key is absent. Blobs with an older version
/// are passed through `migrate(version, state)` before decoding; blobs newer
/// than `current` fail with [`StorageError::UnsupportedVersion`].
pub fn load_versioned<S, T, F>(
    store: &S,
    key: &str,
    current: u32,
    migrate: F,
) -> Result<Option<T>, StorageError>
where
    S: StateStore + ?Sized,
    T: DeserializeOwned,
    F: FnOnce(u32, serde_json::Value) -> serde_json::Value,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let envelope: RawEnvelope = serde_json::from_str(&raw)?;
    if envelope.version > current {
        return Err(StorageError::UnsupportedVersion {
            key: key.to_string(),
            found: envelope.version,
            supported: current,
        });
    }
    let state = if envelope.version < current {
        tracing::debug!(key, from = envelope.version, to = current, "migrating persisted state");
        migrate(envelope.version, envelope.state)
    } else {
        envelope.state
    };
    Ok(Some(serde_json::from_value(state)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        n: u32,
    }

    #[test]
    fn test_absent_key_is_none() {
        let store = InMemoryStore::new();
        let loaded: Option<Counter> = load_versioned(&store, "k", 1, |_, v| v).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_envelope_layout() {
        let mut store = InMemoryStore::new();
        save_versioned(&mut store, "k", 1, &Counter { n: 3 }).unwrap();
        assert_eq!(
            store.get("k").unwrap().as_deref(),
            Some(r#"{"state":{"n":3},"version":1}"#)
        );
    }

    #[test]
    fn test_older_version_is_migrated() {
        let mut store = InMemoryStore::new();
        store.set("k", r#"{"state":{"count":7},"version":0}"#).unwrap();

        let loaded: Option<Counter> = load_versioned(&store, "k", 1, |from, mut v| {
            assert_eq!(from, 0);
            let n = v["count"].take();
            serde_json::json!({ "n": n })
        })
        .unwrap();
        assert_eq!(loaded, Some(Counter { n: 7 }));
    }

    #[test]
    fn test_missing_version_defaults_to_zero() {
        let mut store = InMemoryStore::new();
        store.set("k", r#"{"state":{"n":1}}"#).unwrap();
        let mut seen = None;
        let loaded: Option<Counter> = load_versioned(&store, "k", 1, |from, v| {
            seen = Some(from);
            v
        })
        .unwrap();
        assert_eq!(seen, Some(0));
        assert_eq!(loaded, Some(Counter { n: 1 }));
    }

    #[test]
    fn test_newer_version_is_refused() {
        let mut store = InMemoryStore::new();
        store.set("k", r#"{"state":{"n":1},"version":5}"#).unwrap();
        let err = load_versioned::<_, Counter, _>(&store, "k", 1, |_, v| v).unwrap_err();
        match err {
            StorageError::UnsupportedVersion { found, supported, .. } => {
                assert_eq!(found, 5);
                assert_eq!(supported, 1);
            }
            other => panic!("expected UnsupportedVersion, got: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_is_serialization_error() {
        let mut store = InMemoryStore::new();
        store.set("k", "not json").unwrap();
        let err = load_versioned::<_, Counter, _>(&store, "k", 1, |_, v| v).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
