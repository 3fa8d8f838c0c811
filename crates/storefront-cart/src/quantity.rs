//! Requested quantities and clamping.
//!
//! Callers hand the cart whatever number the user typed. Fractional input
//! is floored, anything that is not a finite number is rejected, and the
//! result is clamped to `[1, MAX_QUANTITY_PER_ITEM]` before any inventory
//! check.

use crate::constants::MAX_QUANTITY_PER_ITEM;

/// A quantity as requested by the caller, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedQuantity(Option<i64>);

impl RequestedQuantity {
    /// The floored request, or `None` if it was not a finite number.
    pub fn floored(self) -> Option<i64> {
        self.0
    }

    /// The request clamped to `[1, MAX_QUANTITY_PER_ITEM]`.
    pub fn clamped(self) -> Option<u32> {
        self.0.map(clamp_quantity)
    }
}

/// Clamps an integer quantity to `[1, MAX_QUANTITY_PER_ITEM]`.
pub fn clamp_quantity(quantity: i64) -> u32 {
    quantity.clamp(1, i64::from(MAX_QUANTITY_PER_ITEM)) as u32
}

impl From<i64> for RequestedQuantity {
    fn from(q: i64) -> Self {
        RequestedQuantity(Some(q))
    }
}

impl From<i32> for RequestedQuantity {
    fn from(q: i32) -> Self {
        RequestedQuantity(Some(i64::from(q)))
    }
}

impl From<u32> for RequestedQuantity {
    fn from(q: u32) -> Self {
        RequestedQuantity(Some(i64::from(q)))
    }
}

impl From<f64> for RequestedQuantity {
    fn from(q: f64) -> Self {
        if q.is_finite() {
            // `as` saturates at the i64 bounds.
            RequestedQuantity(Some(q.floor() as i64))
        } else {
            RequestedQuantity(None)
        }
    }
}
