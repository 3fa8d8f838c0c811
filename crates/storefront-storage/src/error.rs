//! Storage error types for storefront-storage.
//!
//! [`StorageError`] covers the failure modes of the key-value backends and
//! of the JSON envelope layered on top of them.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SQLite backend reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A persisted blob was written by a newer schema than this build knows.
    #[error("unsupported version for key '{key}': found {found}, supported up to {supported}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },

    /// The backend refused a write.
    #[error("write rejected for key '{key}': {reason}")]
    WriteRejected { key: String, reason: String },
}
