//! Money helpers.
//!
//! All amounts are [`Decimal`] so cents are exact. Rounding is applied only
//! where callers ask for it, never on intermediate terms.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, half away from zero.
///
/// For the non-negative amounts a storefront deals in this is round-half-up.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as a dollar price with exactly two decimals.
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", round_cents(amount))
}
