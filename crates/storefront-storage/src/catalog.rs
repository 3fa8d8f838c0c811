//! Persistence for locally stored catalog overrides.
//!
//! Overrides live under two keys, one JSON array each, so products and
//! variants can be replaced independently.

use storefront_core::catalog::CatalogData;
use storefront_core::product::{Product, Variant};

use crate::error::StorageError;
use crate::traits::StateStore;

/// Key holding the override product array.
pub const CATALOG_PRODUCTS_KEY: &str = "admin_products";

/// Key holding the override variant array.
pub const CATALOG_VARIANTS_KEY: &str = "admin_variants";

/// Loads override records. Missing keys read as empty arrays.
pub fn load_catalog_overrides<S>(store: &S) -> Result<CatalogData, StorageError>
where
    S: StateStore + ?Sized,
{
    let products: Vec<Product> = match store.get(CATALOG_PRODUCTS_KEY)? {
        Some(json) => serde_json::from_str(&json)?,
        None => Vec::new(),
    };
    let variants: Vec<Variant> = match store.get(CATALOG_VARIANTS_KEY)? {
        Some(json) => serde_json::from_str(&json)?,
        None => Vec::new(),
    };
    Ok(CatalogData { products, variants })
}

/// Replaces the stored override records.
pub fn save_catalog_overrides<S>(store: &mut S, data: &CatalogData) -> Result<(), StorageError>
where
    S: StateStore + ?Sized,
{
    store.set(CATALOG_PRODUCTS_KEY, &serde_json::to_string(&data.products)?)?;
    store.set(CATALOG_VARIANTS_KEY, &serde_json::to_string(&data.variants)?)?;
    Ok(())
}

/// Deletes all stored override records.
pub fn clear_catalog_overrides<S>(store: &mut S) -> Result<(), StorageError>
where
    S: StateStore + ?Sized,
{
    store.remove(CATALOG_PRODUCTS_KEY)?;
    store.remove(CATALOG_VARIANTS_KEY)?;
    Ok(())
}
