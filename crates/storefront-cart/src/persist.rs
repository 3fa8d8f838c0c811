//! Persisted ledger state: the blob stored under the cart key.

use serde::{Deserialize, Serialize};

use crate::line::CartLine;
use crate::wishlist::WishlistEntry;

/// Default key for the ledger blob.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Current blob version.
pub const CART_STORAGE_VERSION: u32 = 1;

/// Ledger state as stored: `{ "items": [...], "wishlist": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub wishlist: Vec<WishlistEntry>,
}

/// Brings an older blob's state up to [`CART_STORAGE_VERSION`].
///
/// Version 0 blobs have the same shape as version 1, minus the optional
/// wishlist, which `serde(default)` already covers.
pub fn migrate_state(_from: u32, state: serde_json::Value) -> serde_json::Value {
    state
}

/// Borrowed view of the ledger state, serialized without cloning.
#[derive(Debug, Serialize)]
pub(crate) struct PersistedStateRef<'a> {
    pub items: &'a [CartLine],
    pub wishlist: &'a [WishlistEntry],
}
