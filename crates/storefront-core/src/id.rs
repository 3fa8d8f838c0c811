//! Identifier newtypes for catalog and cart entities.
//!
//! Catalog identifiers are opaque strings assigned by whoever authored the
//! catalog data. Wrapping them keeps a `ProductId` from being passed where a
//! `VariantId` is expected, which matters because both are plain strings on
//! the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

/// Variant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub String);

/// Cart line identifier.
///
/// Always derived from a (product, variant) pair via [`LineId::for_pair`],
/// so the same combination maps to the same line every time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl VariantId {
    pub fn new(id: impl Into<String>) -> Self {
        VariantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl LineId {
    pub fn new(id: impl Into<String>) -> Self {
        LineId(id.into())
    }

    /// Composite line id for a product/variant pair: `"{product}-{variant}"`.
    pub fn for_pair(product: &ProductId, variant: &VariantId) -> Self {
        LineId(format!("{}-{}", product.0, variant.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId(s.to_string())
    }
}

impl From<&str> for VariantId {
    fn from(s: &str) -> Self {
        VariantId(s.to_string())
    }
}

impl From<&str> for LineId {
    fn from(s: &str) -> Self {
        LineId(s.to_string())
    }
}
