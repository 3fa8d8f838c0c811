//! Order pricing: subtotal, shipping, tax and total.
//!
//! These are pure functions of the lines. Rounding to cents happens only
//! for tax and for the final total; the subtotal and the sum feeding the
//! total stay exact.
//!
//! The cart refuses any change whose prices would leave the `Decimal`
//! range (see [`checked_subtotal`]), so the saturating paths here only
//! matter for hand-built lines.

use serde::{Deserialize, Serialize};

use storefront_core::{round_cents, Decimal};

use crate::constants::{FREE_SHIPPING_THRESHOLD, STANDARD_SHIPPING_COST, TAX_RATE};
use crate::line::CartLine;

/// All derived amounts for a cart, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Breakdown for the given lines.
    pub fn for_lines(lines: &[CartLine]) -> Self {
        Self::for_subtotal(subtotal_of(lines))
    }

    /// Breakdown for an already-computed subtotal. Saturates at the
    /// `Decimal` bounds.
    pub fn for_subtotal(subtotal: Decimal) -> Self {
        let shipping = shipping_for(subtotal);
        let tax = tax_for(subtotal);
        PriceBreakdown {
            subtotal,
            shipping,
            tax,
            total: round_cents(subtotal.saturating_add(shipping).saturating_add(tax)),
        }
    }

    /// Like [`PriceBreakdown::for_subtotal`], or `None` if any amount
    /// overflows.
    pub fn checked_for_subtotal(subtotal: Decimal) -> Option<Self> {
        let shipping = shipping_for(subtotal);
        let tax = round_cents(subtotal.checked_mul(TAX_RATE)?);
        let total = round_cents(subtotal.checked_add(shipping)?.checked_add(tax)?);
        Some(PriceBreakdown {
            subtotal,
            shipping,
            tax,
            total,
        })
    }
}

/// Sum of `price × quantity` over all lines, floored at zero.
///
/// Saturates instead of overflowing, logging when it does.
pub fn subtotal_of(lines: &[CartLine]) -> Decimal {
    let items = lines.iter().map(|l| (l.variant.price, l.quantity));
    match checked_subtotal(items) {
        Some(sum) => sum,
        None => {
            tracing::warn!(lines = lines.len(), "cart subtotal overflowed, saturating");
            let sum = lines
                .iter()
                .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.line_total()));
            sum.max(Decimal::ZERO)
        }
    }
}

/// Subtotal of `(unit price, quantity)` pairs, floored at zero, or `None`
/// if any product or partial sum overflows.
pub fn checked_subtotal<I>(items: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Decimal, u32)>,
{
    let mut sum = Decimal::ZERO;
    for (price, quantity) in items {
        sum = sum.checked_add(price.checked_mul(Decimal::from(quantity))?)?;
    }
    Some(sum.max(Decimal::ZERO))
}

/// Zero at or above the free-shipping threshold, the flat fee below it.
pub fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal >= FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        STANDARD_SHIPPING_COST
    }
}

/// Subtotal times the tax rate, rounded to cents.
pub fn tax_for(subtotal: Decimal) -> Decimal {
    round_cents(subtotal.saturating_mul(TAX_RATE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use storefront_core::{Product, Variant};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn shipping_steps_at_threshold() {
        assert_eq!(shipping_for(d("99.99")), d("10.00"));
        assert_eq!(shipping_for(d("100.00")), Decimal::ZERO);
        assert_eq!(shipping_for(Decimal::ZERO), d("10.00"));
    }

    fn line(price: &str, quantity: u32) -> CartLine {
        CartLine::new(
            Product::new("P", "Gift Card", d(price)),
            Variant::new("V", "P", d(price), 50),
            quantity,
        )
    }

    #[test]
    fn subtotal_is_floored_at_zero() {
        let lines = vec![line("-25.00", 2), line("10.00", 1)];
        assert_eq!(subtotal_of(&lines), Decimal::ZERO);

        let b = PriceBreakdown::for_lines(&lines);
        assert_eq!(b.shipping, d("10.00"));
        assert_eq!(b.tax, Decimal::ZERO);
        assert_eq!(b.total, d("10.00"));
    }

    #[test]
    fn negative_lines_offset_positive_ones() {
        let lines = vec![line("-5.00", 1), line("40.01", 1)];
        assert_eq!(subtotal_of(&lines), d("35.01"));
    }

    #[test]
    fn overflowing_lines_saturate_instead_of_panicking() {
        let mut huge = line("1", 2);
        huge.variant.price = Decimal::MAX;
        let lines = vec![huge.clone(), line("1", 1)];

        assert_eq!(huge.checked_line_total(), None);
        assert_eq!(huge.line_total(), Decimal::MAX);
        assert_eq!(
            checked_subtotal(lines.iter().map(|l| (l.variant.price, l.quantity))),
            None
        );
        assert_eq!(subtotal_of(&lines), Decimal::MAX);
        assert!(PriceBreakdown::checked_for_subtotal(Decimal::MAX).is_none());
        assert_eq!(PriceBreakdown::for_lines(&lines).shipping, Decimal::ZERO);
    }

    #[test]
    fn single_item_breakdown() {
        let b = PriceBreakdown::for_subtotal(d("159.99"));
        assert_eq!(b.shipping, Decimal::ZERO);
        assert_eq!(b.tax, d("12.80"));
        assert_eq!(b.total, d("172.79"));
    }

    #[test]
    fn below_threshold_breakdown() {
        let b = PriceBreakdown::for_subtotal(d("40.01"));
        assert_eq!(b.shipping, d("10.00"));
        assert_eq!(b.tax, d("3.20"));
        assert_eq!(b.total, d("53.21"));
    }

    proptest! {
        #[test]
        fn total_is_rounded_sum(cents in 0i64..100_000_000) {
            let subtotal = Decimal::new(cents, 2);
            let b = PriceBreakdown::for_subtotal(subtotal);
            prop_assert_eq!(b.total, round_cents(b.subtotal + b.shipping + b.tax));
            prop_assert_eq!(PriceBreakdown::checked_for_subtotal(subtotal), Some(b));
            prop_assert!(b.tax >= Decimal::ZERO);
            prop_assert!(b.total >= b.subtotal);
        }

        #[test]
        fn shipping_is_a_step_function(cents in 0i64..100_000_000) {
            let subtotal = Decimal::new(cents, 2);
            let expected = if cents >= 10_000 { Decimal::ZERO } else { Decimal::TEN };
            prop_assert_eq!(shipping_for(subtotal), expected);
        }
    }
}
