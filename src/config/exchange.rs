//! Configuration for the hybrid ladder exchange.

use crate::domain::{AccountId, BasisPoints, FeeTier};
use crate::error::AmmError;

/// Immutable parameters of an [`Exchange`](crate::exchange::Exchange).
///
/// # Fields
///
/// - `account`: ledger account that custodies the AMM reserves
/// - `price_spread`: distance between adjacent rungs, in basis points
/// - `fee_tier`: AMM-leg fee, retained in reserves (ladder fills are fee-free)
/// - `max_rungs_per_trade`: how many rung advances one trade may make
///
/// # Validation
///
/// - `price_spread` must be within `1..=10_000`.
/// - `fee_tier` must be strictly below 100%.
/// - `max_rungs_per_trade` must be non-zero.
///
/// # Examples
///
/// ```
/// use hydra_ladder::config::ExchangeConfig;
/// use hydra_ladder::domain::{AccountId, BasisPoints, FeeTier};
///
/// let cfg = ExchangeConfig::new(
///     AccountId::from_index(1),
///     BasisPoints::new(250),
///     FeeTier::ZERO,
///     64,
/// )
/// .expect("valid config");
/// assert_eq!(cfg.price_spread().get(), 250);
///
/// assert!(ExchangeConfig::new(AccountId::from_index(1), BasisPoints::ZERO, FeeTier::ZERO, 64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeConfig {
    account: AccountId,
    price_spread: BasisPoints,
    fee_tier: FeeTier,
    max_rungs_per_trade: u32,
}

impl ExchangeConfig {
    /// Rung spacing used by [`with_defaults`](Self::with_defaults): 2.5%.
    pub const DEFAULT_PRICE_SPREAD: BasisPoints = BasisPoints::new(250);

    /// Rung-advance cap used by [`with_defaults`](Self::with_defaults).
    pub const DEFAULT_MAX_RUNGS_PER_TRADE: u32 = 1_024;

    /// Creates a new `ExchangeConfig`.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn new(
        account: AccountId,
        price_spread: BasisPoints,
        fee_tier: FeeTier,
        max_rungs_per_trade: u32,
    ) -> Result<Self, AmmError> {
        let config = Self {
            account,
            price_spread,
            fee_tier,
            max_rungs_per_trade,
        };
        config.validate()?;
        Ok(config)
    }

    /// Fee-free config with a 2.5% spread, custodied by `account`.
    #[must_use]
    pub const fn with_defaults(account: AccountId) -> Self {
        Self {
            account,
            price_spread: Self::DEFAULT_PRICE_SPREAD,
            fee_tier: FeeTier::ZERO,
            max_rungs_per_trade: Self::DEFAULT_MAX_RUNGS_PER_TRADE,
        }
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if the spread is zero or above
    ///   10 000 bps, or the rung cap is zero.
    /// - [`AmmError::InvalidFee`] if the fee tier is 100% or more.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.price_spread.get() == 0 || !self.price_spread.is_valid_percent() {
            return Err(AmmError::InvalidConfiguration(
                "price spread must be within 1..=10000 bps",
            ));
        }
        if !self.fee_tier.is_valid() {
            return Err(AmmError::InvalidFee("fee tier must be below 100%"));
        }
        if self.max_rungs_per_trade == 0 {
            return Err(AmmError::InvalidConfiguration(
                "max rungs per trade must be non-zero",
            ));
        }
        Ok(())
    }

    /// Returns the custody account.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.account
    }

    /// Returns the rung spacing.
    #[must_use]
    pub const fn price_spread(&self) -> BasisPoints {
        self.price_spread
    }

    /// Returns the AMM fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Returns the per-trade rung-advance cap.
    #[must_use]
    pub const fn max_rungs_per_trade(&self) -> u32 {
        self.max_rungs_per_trade
    }
}
