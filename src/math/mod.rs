//! Arithmetic utilities for exchange calculations.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe operations
//! on domain wrappers, [`div_round`] for explicit division rounding, and
//! 256-bit helpers ([`mul_div`], [`sqrt_mul_div`]) for the fixed-point
//! products that do not fit in `u128`.

mod checked;
mod rounding;
mod wide;

pub use checked::CheckedArithmetic;
pub use rounding::div_round;
pub use wide::{U256, div_wide, mul_div, narrow, sqrt_mul_div};
