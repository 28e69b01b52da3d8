//! The two-sided price ladder.
//!
//! [`PriceLadder`] tracks the active floor and ceiling rungs and owns every
//! level created on either side. Levels are only ever added one step
//! beyond the active rung, so each side is a contiguous chain of prices.

mod price_ladder;

pub use price_ladder::PriceLadder;
