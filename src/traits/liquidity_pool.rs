//! Liquidity-provider share accounting on top of [`SwapPool`].
//!
//! # Share Accounting Invariant
//!
//! [`LiquidityPool::total_shares`] only changes through seeding,
//! [`LiquidityPool::add_liquidity`], and [`LiquidityPool::remove_liquidity`],
//! and always equals the sum of every holder's balance:
//!
//! ```text
//! total_shares = Σ shares_of(holder)
//! ```
//!
//! Deposits and withdrawals move both reserves in exact proportion to the
//! shares minted or burned, rounded in the pool's favor, so existing
//! holders are never diluted.

use super::SwapPool;
use crate::domain::{AccountId, Amount, Shares};
use crate::error::AmmError;

/// What a liquidity deposit took and minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiquidityReceipt {
    /// Shares minted to the provider.
    pub shares: Shares,
    /// Base pulled from the provider.
    pub base: Amount,
    /// Asset pulled from the provider.
    pub asset: Amount,
}

/// A pricing curve whose reserves are owned by share holders.
///
/// # Errors
///
/// Common error variants across methods:
///
/// - [`AmmError::PoolNotInitialized`]: the pool was never seeded
/// - [`AmmError::InsufficientShares`]: burning or moving more than held
/// - [`AmmError::SlippageExceeded`]: a min/max bound was violated
pub trait LiquidityPool: SwapPool {
    /// Deposits `base` and the proportional asset, capped by `asset_max`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotInitialized`] if the pool was never seeded.
    /// - [`AmmError::InvalidQuantity`] if `base` is zero or mints no shares.
    /// - [`AmmError::SlippageExceeded`] if the required asset exceeds `asset_max`.
    fn add_liquidity(
        &mut self,
        provider: AccountId,
        base: Amount,
        asset_max: Amount,
    ) -> Result<LiquidityReceipt, AmmError>;

    /// Burns `shares` and returns the proportional `(base, asset)` payout.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientShares`] if `shares` exceeds the holder's balance.
    /// - [`AmmError::SlippageExceeded`] if either payout is below its minimum.
    fn remove_liquidity(
        &mut self,
        provider: AccountId,
        shares: Shares,
        min_base: Amount,
        min_asset: Amount,
    ) -> Result<(Amount, Amount), AmmError>;

    /// Moves shares between holders.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientShares`] if `from` holds fewer than `shares`.
    fn transfer_shares(
        &mut self,
        from: AccountId,
        to: AccountId,
        shares: Shares,
    ) -> Result<(), AmmError>;

    /// Total outstanding shares.
    #[must_use]
    fn total_shares(&self) -> Shares;

    /// Shares held by `holder`.
    #[must_use]
    fn shares_of(&self, holder: &AccountId) -> Shares;
}
