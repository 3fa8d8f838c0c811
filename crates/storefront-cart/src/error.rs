//! Cart and checkout error types.
//!
//! [`CartError`] is the tagged result behind the ledger's boolean facade.
//! Callers that only branch on success use the facade; callers that want
//! to tell "out of stock" from "too many" use the `try_*` methods.

use thiserror::Error;

use storefront_core::{LineId, ProductId, VariantId};
use storefront_storage::StorageError;

/// Why a cart or wishlist operation was rejected.
#[derive(Debug, Error)]
pub enum CartError {
    /// Missing identifier or a quantity that is not a finite number.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The variant is flagged unavailable.
    #[error("variant {variant} is unavailable")]
    VariantUnavailable { variant: VariantId },

    /// The variant does not hold enough stock for the request.
    #[error("insufficient inventory for variant {variant}: requested {requested}, available {available}")]
    InsufficientInventory {
        variant: VariantId,
        requested: u32,
        available: u32,
    },

    /// Merging into an existing line would exceed the per-item cap.
    #[error("line {line} holds {existing}, adding {requested} exceeds the maximum of {cap}")]
    QuantityCapExceeded {
        line: LineId,
        existing: u32,
        requested: u32,
        cap: u32,
    },

    /// A different product/variant pair already owns this line id, as
    /// happens when the ids themselves contain hyphens.
    #[error("line id {line} is already used by another product/variant pair")]
    LineIdConflict { line: LineId },

    /// The product is already on the wishlist.
    #[error("product {product} is already in the wishlist")]
    AlreadyInWishlist { product: ProductId },

    /// The product is not on the wishlist.
    #[error("product {product} is not in the wishlist")]
    NotInWishlist { product: ProductId },

    /// The catalog has no variant of the product that can ship.
    #[error("no available variant for product {product}")]
    NoAvailableVariant { product: ProductId },

    /// Persisting the new state failed; the mutation was rolled back.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CartError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Why a checkout was refused.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Required contact or address fields are missing or malformed.
    #[error("invalid checkout details: {}", fields.join(", "))]
    InvalidDetails { fields: Vec<&'static str> },

    /// Some lines are no longer available.
    #[error("{} item(s) are no longer available", lines.len())]
    UnavailableItems { lines: Vec<LineId> },

    /// Clearing the cart after the order could not be persisted.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
