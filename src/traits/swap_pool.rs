//! Pricing-curve trait the router trades against.
//!
//! [`SwapPool`] is the seam between the ladder router and the continuous
//! pricing curve that absorbs whatever the fixed-price rungs do not.
//! It covers:
//!
//! 1. **Quote**: [`SwapPool::quote_exact_in`] / [`SwapPool::quote_exact_out`]
//!    price a leg without touching reserves.
//! 2. **Execute**: [`SwapPool::swap_exact_in`] / [`SwapPool::swap_exact_out`]
//!    price a leg and apply it.
//! 3. **Reach**: [`SwapPool::input_to_reach`] sizes the leg that brings
//!    the curve's marginal rate to a rung's fixed rate.
//! 4. **Inspect**: [`SwapPool::spot_price`] and [`SwapPool::fee_tier`].
//!
//! # Fee Deduction Invariant
//!
//! Fees are deducted from the input before the pricing formula runs, and
//! the fee stays in the input reserve:
//!
//! ```text
//! fee        = ceil(amount_in × fee_bps / 10_000)
//! net_input  = amount_in − fee
//! amount_out = price_curve(net_input)
//! ```

use crate::domain::{Amount, FeeTier, Price, SwapLeg, TradeDirection};
use crate::error::AmmError;

/// A continuous pricing curve over the base/asset pair.
///
/// # Errors
///
/// Common error variants across methods:
///
/// - [`AmmError::ZeroReserve`]: the curve holds no liquidity
/// - [`AmmError::InsufficientLiquidity`]: an exact output would drain a reserve
/// - [`AmmError::Overflow`]: arithmetic overflow during calculation
pub trait SwapPool {
    /// Prices selling exactly `amount_in` in `direction`.
    ///
    /// A dust input may produce zero output.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount_in` is zero.
    /// - [`AmmError::ZeroReserve`] if either reserve is zero.
    fn quote_exact_in(&self, direction: TradeDirection, amount_in: Amount)
    -> Result<SwapLeg, AmmError>;

    /// Prices buying exactly `amount_out` in `direction`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount_out` is zero.
    /// - [`AmmError::InsufficientLiquidity`] if `amount_out` is not
    ///   strictly below the output reserve.
    fn quote_exact_out(
        &self,
        direction: TradeDirection,
        amount_out: Amount,
    ) -> Result<SwapLeg, AmmError>;

    /// Executes an exact-input leg and updates reserves.
    ///
    /// # Errors
    ///
    /// Same as [`quote_exact_in`](Self::quote_exact_in).
    fn swap_exact_in(
        &mut self,
        direction: TradeDirection,
        amount_in: Amount,
    ) -> Result<SwapLeg, AmmError>;

    /// Executes an exact-output leg and updates reserves.
    ///
    /// # Errors
    ///
    /// Same as [`quote_exact_out`](Self::quote_exact_out).
    fn swap_exact_out(
        &mut self,
        direction: TradeDirection,
        amount_out: Amount,
    ) -> Result<SwapLeg, AmmError>;

    /// Gross input, in `direction`, after which the curve stops paying
    /// more than a fixed-price rung at `rate` would.
    ///
    /// Returns zero if the rung is already at least as good as the curve.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroReserve`] if either reserve is zero.
    /// - [`AmmError::Overflow`] if the invariant product overflows.
    fn input_to_reach(&self, direction: TradeDirection, rate: Price) -> Result<Amount, AmmError>;

    /// Current spot price in asset per base.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ZeroReserve`] if either reserve is zero.
    fn spot_price(&self) -> Result<Price, AmmError>;

    /// Fee applied to input routed through the curve.
    #[must_use]
    fn fee_tier(&self) -> FeeTier;
}
