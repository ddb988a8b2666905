//! Rounding rules for VAT amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` and every rounding step goes
//! through these helpers so that per-line sums and stored totals agree.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of a currency amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Decimal places of a credit coefficient.
pub const COEFFICIENT_SCALE: u32 = 3;

/// Rounds an amount half-up to currency precision (2 decimal places).
///
/// The result always carries exactly two decimal places, so `10` becomes `10.00`.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    round_to(amount, CURRENCY_SCALE)
}

/// Rounds a ratio half-up to coefficient precision (3 decimal places).
#[must_use]
pub fn round_coefficient(ratio: Decimal) -> Decimal {
    round_to(ratio, COEFFICIENT_SCALE)
}

fn round_to(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}
