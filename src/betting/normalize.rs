//! Wager amount normalization.
//!
//! Turns a parsed wager into a canonical major-unit value against the
//! player's current balance. Rejection of bad input happens earlier, in
//! the validator; normalization never fails on its own.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::WagerAmount;

/// Canonical major-unit amount for a wager.
///
/// All-in resolves to the player's entire balance; fixed amounts are
/// rounded to two decimal places, half-up at the hundredths digit.
pub fn normalize(wager: &WagerAmount, balance_minor: i64) -> Decimal {
    match wager {
        WagerAmount::AllIn => Decimal::from(balance_minor) / dec!(100),
        WagerAmount::Fixed(d) => {
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
    }
}

/// Convert a normalized major-unit amount to minor units.
///
/// Returns None when the value does not fit an i64, which settlement
/// treats as an invalid bet.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount.checked_mul(dec!(100))?.round().to_i64()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
