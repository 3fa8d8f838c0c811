//! Catalog lookup.
//!
//! [`CatalogSource`] is the boundary the cart sees: lookups by id that
//! return owned snapshots. [`Catalog`] is the in-memory implementation,
//! built from a static JSON document and optionally merged with locally
//! stored override records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{ProductId, VariantId};
use crate::product::{Product, Variant};

/// Read access to catalog records.
///
/// Returned values are owned copies; callers that keep them hold a
/// snapshot, not a live view.
pub trait CatalogSource {
    /// Looks up a product by id.
    fn product(&self, id: &ProductId) -> Option<Product>;

    /// Looks up a variant by id.
    fn variant(&self, id: &VariantId) -> Option<Variant>;

    /// All variants belonging to a product, in catalog order.
    fn variants_for(&self, product: &ProductId) -> Vec<Variant>;

    /// First variant of a product that can ship at least one unit.
    ///
    /// A product without any variants falls back to its default variant;
    /// a product whose variants are all out of stock yields `None`.
    fn first_available_variant(&self, product: &ProductId) -> Option<Variant> {
        let p = self.product(product)?;
        let variants = self.variants_for(product);
        if variants.is_empty() {
            return Some(p.default_variant(None, None));
        }
        variants.into_iter().find(Variant::in_stock)
    }
}

/// Serialized catalog shape: `{ "products": [...], "variants": [...] }`.
///
/// Also the shape of locally stored override data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl CatalogData {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.variants.is_empty()
    }
}

/// In-memory catalog keyed by id, preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: IndexMap<ProductId, Product>,
    variants: IndexMap<VariantId, Variant>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Builds a catalog from already-parsed records.
    ///
    /// Later records with a duplicate id replace earlier ones. Every variant
    /// must belong to a product in the same document.
    pub fn from_data(data: CatalogData) -> Result<Self, CoreError> {
        let mut catalog = Catalog::new();
        catalog.merge_overrides(data)?;
        Ok(catalog)
    }

    /// Merges override records into the catalog.
    ///
    /// Records whose id already exists replace the existing record in place;
    /// new ids are appended. Returns the number of records inserted or
    /// replaced. Validation happens before anything is written, so a
    /// rejected merge leaves the catalog untouched.
    pub fn merge_overrides(&mut self, overrides: CatalogData) -> Result<usize, CoreError> {
        for product in &overrides.products {
            if product.id.is_blank() {
                return Err(CoreError::InvalidRecord {
                    reason: "product with empty id".to_string(),
                });
            }
        }
        for variant in &overrides.variants {
            if variant.id.is_blank() {
                return Err(CoreError::InvalidRecord {
                    reason: "variant with empty id".to_string(),
                });
            }
            let known = self.products.contains_key(&variant.product_id)
                || overrides.products.iter().any(|p| p.id == variant.product_id);
            if !known {
                return Err(CoreError::OrphanVariant {
                    variant: variant.id.clone(),
                    product: variant.product_id.clone(),
                });
            }
        }

        let touched = overrides.products.len() + overrides.variants.len();
        for product in overrides.products {
            self.products.insert(product.id.clone(), product);
        }
        for variant in overrides.variants {
            self.variants.insert(variant.id.clone(), variant);
        }
        Ok(touched)
    }

    /// Exports the catalog in its serialized shape.
    pub fn to_data(&self) -> CatalogData {
        CatalogData {
            products: self.products.values().cloned().collect(),
            variants: self.variants.values().cloned().collect(),
        }
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// All products in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Products flagged active, in catalog order.
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.values().filter(|p| p.is_active)
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.values().find(|p| p.slug == slug)
    }

    fn variants_of<'a>(&'a self, product: &'a ProductId) -> impl Iterator<Item = &'a Variant> {
        self.variants
            .values()
            .filter(move |v| &v.product_id == product)
    }

    /// Distinct sizes offered for a product, sorted.
    pub fn sizes_for(&self, product: &ProductId) -> Vec<String> {
        let mut sizes: Vec<String> = Vec::new();
        for v in self.variants_of(product) {
            if !sizes.contains(&v.size) {
                sizes.push(v.size.clone());
            }
        }
        sizes.sort();
        sizes
    }

    /// Distinct colors offered for a product, in first-seen order.
    pub fn colors_for(&self, product: &ProductId) -> Vec<String> {
        let mut colors: Vec<String> = Vec::new();
        for v in self.variants_of(product) {
            if !colors.contains(&v.color) {
                colors.push(v.color.clone());
            }
        }
        colors
    }

    /// Picks the variant matching a size/color selection.
    ///
    /// A `None` size or color matches any value, so a size-only selection
    /// picks the first variant of that size in catalog order. With both
    /// given, both must match exactly.
    ///
    /// When the product has no variant matching the selection, a default
    /// variant priced at the product's base price is synthesized. Returns
    /// `None` only when the product itself is unknown.
    pub fn resolve_variant(
        &self,
        product: &ProductId,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Option<Variant> {
        let p = self.products.get(product)?;
        let found = self.variants_of(product).find(|v| {
            size.map_or(true, |s| v.size == s) && color.map_or(true, |c| v.color == c)
        });
        Some(match found {
            Some(v) => v.clone(),
            None => p.default_variant(size, color),
        })
    }
}

impl CatalogSource for Catalog {
    fn product(&self, id: &ProductId) -> Option<Product> {
        self.products.get(id).cloned()
    }

    fn variant(&self, id: &VariantId) -> Option<Variant> {
        self.variants.get(id).cloned()
    }

    fn variants_for(&self, product: &ProductId) -> Vec<Variant> {
        self.variants_of(product).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const SAMPLE: &str = r#"{
        "products": [
            {"id": "p1", "name": "Court Classic", "slug": "court-classic", "base_price": 159.99},
            {"id": "p2", "name": "Trail Runner", "slug": "trail-runner", "base_price": 40.01, "is_active": false},
            {"id": "p3", "name": "Canvas Tote", "slug": "canvas-tote", "base_price": 25}
        ],
        "variants": [
            {"id": "v1", "product_id": "p1", "size": "9", "color": "White", "price": 159.99, "inventory_count": 15},
            {"id": "v1b", "product_id": "p1", "size": "10", "color": "Black", "price": 164.99, "inventory_count": 0},
            {"id": "v1c", "product_id": "p1", "size": "10", "color": "White", "price": 159.99, "inventory_count": 2},
            {"id": "v2", "product_id": "p2", "size": "8", "color": "Green", "price": 40.01, "inventory_count": 3, "is_available": false}
        ]
    }"#;

    fn sample() -> Catalog {
        Catalog::from_json(SAMPLE).unwrap()
    }

    #[test]
    fn parses_sample_catalog() {
        let c = sample();
        assert_eq!(c.product_count(), 3);
        assert_eq!(c.variant_count(), 4);
        assert_eq!(c.active_products().count(), 2);
        assert_eq!(
            c.product_by_slug("trail-runner").map(|p| p.id.clone()),
            Some(ProductId::new("p2"))
        );
    }

    #[test]
    fn rejects_orphan_variant() {
        let err = Catalog::from_json(
            r#"{"products": [], "variants": [{"id": "v9", "product_id": "nope", "price": 1}]}"#,
        )
        .unwrap_err();
        match err {
            CoreError::OrphanVariant { variant, product } => {
                assert_eq!(variant, VariantId::new("v9"));
                assert_eq!(product, ProductId::new("nope"));
            }
            other => panic!("expected OrphanVariant, got: {:?}", other),
        }
    }

    #[test]
    fn sizes_sorted_colors_in_order() {
        let c = sample();
        let p1 = ProductId::new("p1");
        assert_eq!(c.sizes_for(&p1), vec!["10".to_string(), "9".to_string()]);
        assert_eq!(c.colors_for(&p1), vec!["White".to_string(), "Black".to_string()]);
    }

    #[test]
    fn merge_replaces_in_place_and_appends() {
        let mut c = sample();
        let mut changed = c.product(&ProductId::new("p1")).unwrap();
        changed.name = "Court Classic II".into();
        let added = Product::new("p4", "Crew Sock", Decimal::new(900, 2));

        let touched = c
            .merge_overrides(CatalogData {
                products: vec![changed, added],
                variants: vec![],
            })
            .unwrap();

        assert_eq!(touched, 2);
        let names: Vec<&str> = c.products().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Court Classic II", "Trail Runner", "Canvas Tote", "Crew Sock"]
        );
    }

    #[test]
    fn rejected_merge_leaves_catalog_untouched() {
        let mut c = sample();
        let result = c.merge_overrides(CatalogData {
            products: vec![Product::new("p5", "Cap", Decimal::ONE)],
            variants: vec![Variant::new("v5", "ghost", Decimal::ONE, 1)],
        });
        assert!(result.is_err());
        assert_eq!(c.product_count(), 3);
    }

    #[test]
    fn resolve_exact_match() {
        let c = sample();
        let v = c
            .resolve_variant(&ProductId::new("p1"), Some("10"), Some("White"))
            .unwrap();
        assert_eq!(v.id, VariantId::new("v1c"));
    }

    #[test]
    fn resolve_falls_back_to_default_variant() {
        let c = sample();
        let v = c
            .resolve_variant(&ProductId::new("p3"), Some("M"), None)
            .unwrap();
        assert_eq!(v.id, VariantId::new("p3-default"));
        assert_eq!(v.size, "M");
        assert_eq!(v.price, Decimal::new(25, 0));
        assert!(c.resolve_variant(&ProductId::new("missing"), None, None).is_none());
    }

    #[test]
    fn partial_selection_matches_any_value() {
        let c = sample();
        let p1 = ProductId::new("p1");
        let v = c.resolve_variant(&p1, Some("10"), None).unwrap();
        assert_eq!(v.id, VariantId::new("v1b"));
        let v = c.resolve_variant(&p1, None, Some("White")).unwrap();
        assert_eq!(v.id, VariantId::new("v1"));
        let v = c.resolve_variant(&p1, Some("10"), Some("White")).unwrap();
        assert_eq!(v.id, VariantId::new("v1c"));

        let v = c.resolve_variant(&p1, Some("10"), Some("Green")).unwrap();
        assert_eq!(v.id, VariantId::new("p1-default"));
    }

    #[test]
    fn first_available_skips_out_of_stock() {
        let c = sample();
        let v = c.first_available_variant(&ProductId::new("p1")).unwrap();
        assert_eq!(v.id, VariantId::new("v1"));
        // p2's only variant is unavailable.
        assert!(c.first_available_variant(&ProductId::new("p2")).is_none());
        // p3 has no variants at all.
        assert_eq!(
            c.first_available_variant(&ProductId::new("p3")).unwrap().id,
            VariantId::new("p3-default")
        );
    }

    #[test]
    fn catalog_source_returns_snapshots() {
        let c = sample();
        let v = c.variant(&VariantId::new("v1")).unwrap();
        assert_eq!(v.inventory_count, 15);
        assert_eq!(c.variants_for(&ProductId::new("p1")).len(), 3);
    }
}
