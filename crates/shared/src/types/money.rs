//! Decimal helpers for monetary figures and percentages.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Internal arithmetic keeps full `Decimal` precision; rounding happens
//! only when a figure leaves the engine (2 dp for money, 1 dp for percentages),
//! always with banker's rounding (round half to even).

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used for monetary figures in responses.
pub const MONEY_DP: u32 = 2;

/// Decimal places used for percentages in responses.
pub const PERCENT_DP: u32 = 1;

/// Rounds a monetary amount for presentation.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Rounds a percentage for presentation.
#[must_use]
pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PERCENT_DP, RoundingStrategy::MidpointNearestEven)
}

/// Divides `numerator` by `denominator`, yielding zero when the denominator is zero.
#[must_use]
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Returns `value / total * 100`, or zero when `total <= 0`.
#[must_use]
pub fn percent_of(value: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        value / total * Decimal::ONE_HUNDRED
    }
}
