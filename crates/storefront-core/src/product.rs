//! Catalog records: products, their images, and purchasable variants.
//!
//! These are read-only to the cart. Every field except the identifiers is
//! optional on the wire so that partial records (older override blobs,
//! hand-written fixtures) still load.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::id::{ProductId, VariantId};

/// Inventory assigned to a synthesized default variant.
pub const DEFAULT_VARIANT_INVENTORY: u32 = 999;

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub base_price: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// An image attached to a product. Lower `position` sorts first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub product_id: String,
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub position: u32,
}

/// A specific size/color/price/stock combination of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub price: Decimal,
    #[serde(default)]
    pub inventory_count: u32,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Minimal product with the given id, name and base price.
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_price: Decimal) -> Self {
        Product {
            id: ProductId::new(id),
            name: name.into(),
            slug: String::new(),
            description: String::new(),
            brand: String::new(),
            base_price,
            is_active: true,
            category: String::new(),
            rating: 0.0,
            reviews_count: 0,
            images: Vec::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// URL of the lowest-positioned image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .min_by_key(|img| img.position)
            .map(|img| img.url.as_str())
    }

    /// The variant used when a product has no variant matching a selection.
    ///
    /// Priced at the product's base price with a large fixed inventory.
    pub fn default_variant(&self, size: Option<&str>, color: Option<&str>) -> Variant {
        Variant {
            id: VariantId(format!("{}-default", self.id)),
            product_id: self.id.clone(),
            sku: format!("{}-DEFAULT", self.id),
            size: size.unwrap_or("One Size").to_string(),
            color: color.unwrap_or("Default").to_string(),
            price: self.base_price,
            inventory_count: DEFAULT_VARIANT_INVENTORY,
            is_available: true,
        }
    }
}

impl Variant {
    /// Minimal variant with the given ids, price and inventory.
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        price: Decimal,
        inventory_count: u32,
    ) -> Self {
        Variant {
            id: VariantId::new(id),
            product_id: ProductId::new(product_id),
            sku: String::new(),
            size: String::new(),
            color: String::new(),
            price,
            inventory_count,
            is_available: true,
        }
    }

    /// Available and holding at least `quantity` units.
    pub fn can_fulfil(&self, quantity: u32) -> bool {
        self.is_available && self.inventory_count >= quantity
    }

    /// Available with any stock at all.
    pub fn in_stock(&self) -> bool {
        self.is_available && self.inventory_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_product_json_fills_defaults() {
        let p: Product =
            serde_json::from_str(r#"{"id":"p1","name":"Runner","base_price":120}"#).unwrap();
        assert_eq!(p.id, ProductId::new("p1"));
        assert_eq!(p.base_price, Decimal::new(120, 0));
        assert!(p.is_active);
        assert!(p.images.is_empty());
    }

    #[test]
    fn variant_price_accepts_numbers_and_strings() {
        let a: Variant = serde_json::from_str(
            r#"{"id":"v1","product_id":"p1","price":159.99,"inventory_count":15}"#,
        )
        .unwrap();
        let b: Variant = serde_json::from_str(
            r#"{"id":"v1","product_id":"p1","price":"159.99","inventory_count":15}"#,
        )
        .unwrap();
        assert_eq!(a.price, Decimal::new(15999, 2));
        assert_eq!(a, b);
        assert!(a.is_available);
    }

    #[test]
    fn primary_image_is_lowest_position() {
        let mut p = Product::new("p1", "Runner", Decimal::ONE);
        p.images = vec![
            ProductImage {
                id: "i2".into(),
                product_id: "p1".into(),
                url: "/b.png".into(),
                alt: String::new(),
                position: 2,
            },
            ProductImage {
                id: "i1".into(),
                product_id: "p1".into(),
                url: "/a.png".into(),
                alt: String::new(),
                position: 1,
            },
        ];
        assert_eq!(p.primary_image(), Some("/a.png"));
    }

    #[test]
    fn default_variant_uses_base_price() {
        let p = Product::new("p7", "Slide", Decimal::new(3500, 2));
        let v = p.default_variant(None, Some("Red"));
        assert_eq!(v.id, VariantId::new("p7-default"));
        assert_eq!(v.sku, "p7-DEFAULT");
        assert_eq!(v.size, "One Size");
        assert_eq!(v.color, "Red");
        assert_eq!(v.price, Decimal::new(3500, 2));
        assert_eq!(v.inventory_count, DEFAULT_VARIANT_INVENTORY);
    }

    #[test]
    fn fulfilment_checks() {
        let mut v = Variant::new("v1", "p1", Decimal::ONE, 5);
        assert!(v.can_fulfil(5));
        assert!(!v.can_fulfil(6));
        v.is_available = false;
        assert!(!v.can_fulfil(1));
        assert!(!v.in_stock());
    }
}
