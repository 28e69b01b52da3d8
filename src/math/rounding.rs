//! Rounding helpers for integer division.
//!
//! [`div_round`] performs `u128` division with an explicit [`Rounding`]
//! direction.  It backs [`Amount::checked_div`](crate::domain::Amount::checked_div)
//! and [`Shares::checked_div`](crate::domain::Shares::checked_div).
//!
//! # Convention
//!
//! **Always round against the caller** (exchange- and depositor-favorable):
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Trade output (AMM or rung) | [`Rounding::Down`] |
//! | Trade input for an exact output | [`Rounding::Up`] |
//! | AMM fee | [`Rounding::Up`] |
//! | Asset required by `add_liquidity` | [`Rounding::Up`] |
//! | Shares minted, liquidity payout | [`Rounding::Down`] |
//!
//! # Examples
//!
//! ```
//! use hydra_ladder::domain::Rounding;
//! use hydra_ladder::math::div_round;
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(div_round(10, 0, Rounding::Down), None);
//! ```

use crate::domain::Rounding;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => Some(quotient),
        // quotient + 1 cannot overflow: a non-zero remainder implies
        // quotient < numerator ≤ u128::MAX
        Rounding::Up if numerator % denominator != 0 => Some(quotient + 1),
        Rounding::Up => Some(quotient),
    }
}
