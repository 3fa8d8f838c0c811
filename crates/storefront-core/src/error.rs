//! Core error types for storefront-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of catalog parsing and validation.

use thiserror::Error;

use crate::id::{ProductId, VariantId};

/// Core errors produced by the storefront-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalog JSON could not be parsed.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A variant references a product that is not in the catalog.
    #[error("variant {variant} references unknown product {product}")]
    OrphanVariant {
        variant: VariantId,
        product: ProductId,
    },

    /// A catalog record has an empty identifier.
    #[error("invalid catalog record: {reason}")]
    InvalidRecord { reason: String },
}
