//! Core data model for the storefront: catalog records, identifiers and
//! money handling shared by the storage and cart crates.

pub mod catalog;
pub mod error;
pub mod id;
pub mod money;
pub mod product;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogData, CatalogSource};
pub use error::CoreError;
pub use id::{LineId, ProductId, VariantId};
pub use money::{format_price, round_cents};
pub use product::{Product, ProductImage, Variant};
pub use rust_decimal::Decimal;
