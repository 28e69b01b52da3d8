//! Fixed-point exchange rate, quoted in asset per base.

use core::fmt;

use super::basis_points::BPS_DENOMINATOR;
use super::{Amount, BasisPoints, Rounding};
use crate::error::AmmError;
use crate::math::mul_div;

/// Exchange rate in asset units per one base unit, scaled by [`Price::WAD`].
///
/// Both currencies use 18-decimal smallest units, so a raw value of
/// `10 × WAD` means "one base buys ten asset". The AMM spot price is
/// `reserve_asset × WAD / reserve_base`; ceilings sit above it and floors
/// below it.
///
/// A `Price` is always non-zero.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{Amount, Price, Rounding};
///
/// let Ok(spot) = Price::from_reserves(Amount::new(100), Amount::new(10)) else {
///     panic!("non-zero reserves");
/// };
/// assert_eq!(spot.get(), 10 * Price::WAD);
/// assert_eq!(spot.to_string(), "10");
/// assert_eq!(spot.base_to_asset(Amount::new(3), Rounding::Down), Ok(Amount::new(30)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Price(u128);

impl Price {
    /// Fixed-point scale: 18 decimals.
    pub const WAD: u128 = 1_000_000_000_000_000_000;

    /// Price ratio of 1:1.
    pub const ONE: Self = Self(Self::WAD);

    /// Creates a `Price` from a raw WAD-scaled value.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrice`] if `raw` is zero.
    pub const fn new(raw: u128) -> crate::error::Result<Self> {
        if raw == 0 {
            return Err(AmmError::InvalidPrice("price must be non-zero"));
        }
        Ok(Self(raw))
    }

    /// Returns the raw WAD-scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Spot price of a pair of reserves, rounded down.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroReserve`] if either reserve is zero.
    /// - [`AmmError::InvalidPrice`] if the ratio rounds to zero.
    /// - [`AmmError::Overflow`] if the ratio exceeds `u128`.
    pub fn from_reserves(reserve_asset: Amount, reserve_base: Amount) -> crate::error::Result<Self> {
        if reserve_asset.is_zero() || reserve_base.is_zero() {
            return Err(AmmError::ZeroReserve);
        }
        let raw = mul_div(
            reserve_asset.get(),
            Self::WAD,
            reserve_base.get(),
            Rounding::Down,
        )?;
        Self::new(raw)
    }

    /// The next rung above this price: `ceil(p × (10_000 + spread) / 10_000)`.
    ///
    /// Rounding up keeps the step strictly increasing for any non-zero
    /// spread, even at tiny prices.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the stepped price exceeds `u128`.
    pub fn step_up(&self, spread: BasisPoints) -> crate::error::Result<Self> {
        let raw = mul_div(
            self.0,
            BPS_DENOMINATOR + spread.as_u128(),
            BPS_DENOMINATOR,
            Rounding::Up,
        )?;
        Self::new(raw)
    }

    /// The next rung below this price: `floor(p × 10_000 / (10_000 + spread))`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrice`] if the stepped price reaches zero.
    pub fn step_down(&self, spread: BasisPoints) -> crate::error::Result<Self> {
        let raw = mul_div(
            self.0,
            BPS_DENOMINATOR,
            BPS_DENOMINATOR + spread.as_u128(),
            Rounding::Down,
        )?;
        Self::new(raw).map_err(|_| AmmError::InvalidPrice("floor ladder stepped to zero"))
    }

    /// Converts a base amount to asset at this rate: `base × p / WAD`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds `u128`.
    pub fn base_to_asset(&self, base: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        mul_div(base.get(), self.0, Self::WAD, rounding).map(Amount::new)
    }

    /// Converts an asset amount to base at this rate: `asset × WAD / p`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds `u128`.
    pub fn asset_to_base(&self, asset: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        mul_div(asset.get(), Self::WAD, self.0, rounding).map(Amount::new)
    }
}

impl fmt::Display for Price {
    /// Decimal rendering with trailing fractional zeros trimmed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::WAD;
        let frac = self.0 % Self::WAD;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:018}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}
