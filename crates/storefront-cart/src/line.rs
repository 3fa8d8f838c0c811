//! Cart lines.

use serde::{Deserialize, Serialize};

use storefront_core::{Decimal, LineId, Product, Variant};

/// One (product, variant, quantity) entry in the cart.
///
/// `product` and `variant` are snapshots taken when the line was created;
/// later catalog changes do not flow into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: LineId,
    pub product: Product,
    pub variant: Variant,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: Product, variant: Variant, quantity: u32) -> Self {
        CartLine {
            id: LineId::for_pair(&product.id, &variant.id),
            product,
            variant,
            quantity,
        }
    }

    /// Unit price times quantity, unrounded. Saturates at the `Decimal`
    /// bounds.
    pub fn line_total(&self) -> Decimal {
        self.variant.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Unit price times quantity, or `None` if it overflows.
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.variant.price.checked_mul(Decimal::from(self.quantity))
    }

    /// True when this line is for the given product/variant pair.
    pub fn matches(&self, product: &Product, variant: &Variant) -> bool {
        self.product.id == product.id && self.variant.id == variant.id
    }
}
