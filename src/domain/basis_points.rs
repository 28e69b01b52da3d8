//! Basis-point representation for spreads and fees.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::AmmError;
use crate::math::mul_div;

/// Denominator that represents 100%.
pub(crate) const BPS_DENOMINATOR: u128 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Used for the ladder's price spread and the AMM fee. All `u32` values
/// are representable; [`is_valid_percent`](Self::is_valid_percent) tells
/// whether the value is a sensible percentage.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{Amount, BasisPoints, Rounding};
///
/// let spread = BasisPoints::new(250);
/// assert!(spread.is_valid_percent());
/// assert_eq!(spread.apply(Amount::new(1_000), Rounding::Down), Ok(Amount::new(25)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(10_000);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the value widened to `u128` for fixed-point math.
    #[must_use]
    pub const fn as_u128(&self) -> u128 {
        self.0 as u128
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= Self::MAX_PERCENT.0
    }

    /// Computes `amount × self / 10_000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds `u128`.
    pub fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        mul_div(amount.get(), self.as_u128(), BPS_DENOMINATOR, rounding)
            .map(Amount::new)
            .map_err(|_| AmmError::Overflow("basis points apply overflow"))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
