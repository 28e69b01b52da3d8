//! Fixed-price liquidity levels.
//!
//! A [`FixedPriceLevel`] is one rung of the ladder: depositors place the
//! reserve currency at a fixed rate, traders consume it, and depositors
//! withdraw what the traders paid.
//!
//! Fills are priced at the level's rate and rounded down for the trader.
//! Each fill is shared pro-rata among live deposits, walked in ascending
//! account order with cumulative rounding, so the shares add up exactly.

mod fixed_price;

pub use fixed_price::{FixedPriceLevel, LevelFill, LevelTemplate, PositionState};
