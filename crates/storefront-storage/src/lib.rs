//! Storage abstraction for storefront client state.
//!
//! Provides the [`StateStore`] trait defining the key-value contract that
//! all backends implement, plus [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Architecture
//!
//! The storage layer has a two-layer API:
//! - **Low-level** string get/set/remove on the trait, one key per call.
//! - **Typed** helpers that wrap values in a versioned envelope
//!   ([`envelope`]) or read and write catalog overrides ([`catalog`]).
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: StateStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL schema and migration setup
//! - [`sqlite`]: SqliteStore implementation
//! - [`envelope`]: versioned JSON envelopes
//! - [`catalog`]: catalog override keys

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use catalog::{load_catalog_overrides, save_catalog_overrides, clear_catalog_overrides};
pub use envelope::{load_versioned, save_versioned, Envelope};
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::StateStore;
