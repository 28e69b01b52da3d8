//! AMM fee tiers built on [`BasisPoints`].

use core::fmt;

use super::{Amount, BasisPoints, Rounding};

/// The fee charged on input routed to the constant-product curve.
///
/// Fixed-price levels never charge a fee; only the AMM leg of a trade
/// pays it. The fee stays in the reserves, so it accrues to LP holders.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{Amount, FeeTier, Rounding};
///
/// let tier = FeeTier::TIER_0_30_PERCENT;
/// assert_eq!(tier.basis_points().get(), 30);
/// assert_eq!(tier.fee_on(Amount::new(1_000), Rounding::Up), Ok(Amount::new(3)));
/// assert!(FeeTier::ZERO.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// No fee. The default for a new exchange.
    pub const ZERO: Self = Self(BasisPoints::ZERO);

    /// 0.05% fee (5 bp).
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30% fee (30 bp).
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% fee (100 bp).
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a new `FeeTier` from arbitrary [`BasisPoints`].
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Returns `true` if no fee is charged.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.get() == 0
    }

    /// A fee is usable only when strictly below 100%; otherwise no input
    /// would ever reach the curve.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0.get() < BasisPoints::MAX_PERCENT.get()
    }

    /// Computes the fee charged on `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`](crate::error::AmmError::Overflow) if
    /// the result exceeds `u128`.
    pub fn fee_on(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        self.0.apply(amount, rounding)
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
