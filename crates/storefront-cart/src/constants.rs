//! Fixed pricing and quantity rules.

use storefront_core::Decimal;

/// Hard cap on any single line's quantity.
pub const MAX_QUANTITY_PER_ITEM: u32 = 10;

/// Subtotals at or above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Flat shipping fee below the free-shipping threshold.
pub const STANDARD_SHIPPING_COST: Decimal = Decimal::TEN;

/// Flat tax rate applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);
