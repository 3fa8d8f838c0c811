//! Wishlist: saved products, one entry per product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Product, ProductId};

use crate::error::CartError;

/// A saved product with the time it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: ProductId,
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// Saved products in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds from persisted entries, keeping the first of any duplicates.
    pub fn from_entries(entries: Vec<WishlistEntry>) -> Self {
        let mut list = Wishlist::new();
        for entry in entries {
            if !list.contains(&entry.id) {
                list.entries.push(entry);
            }
        }
        list
    }

    /// Saves a product. Fails if it is already saved.
    pub fn add(&mut self, product: &Product, added_at: DateTime<Utc>) -> Result<(), CartError> {
        if product.id.is_blank() {
            return Err(CartError::invalid("missing product id"));
        }
        if self.contains(&product.id) {
            return Err(CartError::AlreadyInWishlist {
                product: product.id.clone(),
            });
        }
        self.entries.push(WishlistEntry {
            id: product.id.clone(),
            product: product.clone(),
            added_at,
        });
        Ok(())
    }

    /// Removes a product. Returns whether anything was removed.
    pub fn remove(&mut self, product: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != product);
        self.entries.len() != before
    }

    /// Drops every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn contains(&self, product: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.id == product)
    }

    pub fn get(&self, product: &ProductId) -> Option<&WishlistEntry> {
        self.entries.iter().find(|e| &e.id == product)
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
