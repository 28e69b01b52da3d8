//! Constant Product pool implementation (Uniswap V2 style).
//!
//! The swap invariant is `x × y = k` where `x` and `y` are the base and
//! asset reserves. Fees are deducted from the input amount **before** the
//! pricing formula is applied and stay in the input reserve.
//!
//! # Swap Algorithm (exact input)
//!
//! 1. `fee = ceil(amount_in × fee_bps / 10 000)`
//! 2. `net_input = amount_in − fee`
//! 3. `amount_out = floor(reserve_out × net_input / (reserve_in + net_input))`
//! 4. `reserve_in += amount_in` (fee stays in the pool)
//! 5. `reserve_out -= amount_out`
//!
//! # Invariant
//!
//! After every swap, `k_after ≥ k_before` because the fee component
//! increases reserves without a corresponding output and both roundings
//! favour the pool.
//!
//! # Shares
//!
//! Shares are denominated in base: seeding mints `base_amount` shares,
//! later deposits mint `base × total_shares / reserve_base`, and
//! withdrawals pay `reserve × shares / total_shares` of each side.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ExchangeConfig;
use crate::domain::{
    AccountId, Amount, FeeTier, Price, Rounding, Shares, SwapLeg, TradeDirection,
};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, U256, mul_div, sqrt_mul_div};
use crate::traits::{FromConfig, LiquidityPool, LiquidityReceipt, SwapPool};

/// Basis-point denominator (10 000 = 100%).
const BPS_DENOMINATOR: u128 = 10_000;

/// A Constant Product AMM pool over the base/asset pair.
///
/// Created unseeded from an [`ExchangeConfig`] via [`FromConfig`]; the
/// first [`initialize`](Self::initialize) sets the reserves and mints the
/// first shares. A pool drained by withdrawals keeps zero reserves until
/// it is seeded again.
///
/// # State
///
/// - `reserve_base` / `reserve_asset`: current balances (raw units, fees included)
/// - `total_shares` / `shares`: LP share supply and holders
/// - `accumulated_fees_base` / `accumulated_fees_asset`: lifetime fee counters
///
/// # Example
///
/// ```rust
/// use hydra_ladder::config::ExchangeConfig;
/// use hydra_ladder::domain::{AccountId, Amount, TradeDirection};
/// use hydra_ladder::pools::ConstantProductPool;
/// use hydra_ladder::traits::{FromConfig, SwapPool};
///
/// let cfg = ExchangeConfig::with_defaults(AccountId::from_index(1));
/// let mut pool = ConstantProductPool::from_config(&cfg).expect("pool created");
/// pool.initialize(AccountId::from_index(2), Amount::new(10_000), Amount::new(100_000))
///     .expect("seeded");
///
/// let leg = pool
///     .swap_exact_in(TradeDirection::AssetToBase, Amount::new(1_000))
///     .expect("swap ok");
/// assert_eq!(leg.amount_out(), Amount::new(99));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantProductPool {
    fee_tier: FeeTier,
    initialized: bool,
    reserve_base: Amount,
    reserve_asset: Amount,
    total_shares: Shares,
    shares: BTreeMap<AccountId, Shares>,
    accumulated_fees_base: Amount,
    accumulated_fees_asset: Amount,
}

impl ConstantProductPool {
    /// Returns `true` once the pool has been seeded.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the current base reserve.
    pub const fn reserve_base(&self) -> Amount {
        self.reserve_base
    }

    /// Returns the current asset reserve.
    pub const fn reserve_asset(&self) -> Amount {
        self.reserve_asset
    }

    /// Returns the lifetime fees collected in base.
    pub const fn accumulated_fees_base(&self) -> Amount {
        self.accumulated_fees_base
    }

    /// Returns the lifetime fees collected in asset.
    pub const fn accumulated_fees_asset(&self) -> Amount {
        self.accumulated_fees_asset
    }

    /// `reserve_base × reserve_asset`, widened.
    #[must_use]
    pub fn invariant(&self) -> U256 {
        U256::from(self.reserve_base.get()) * U256::from(self.reserve_asset.get())
    }

    /// Seeds the reserves and mints `base_amount` shares to `provider`.
    ///
    /// Allowed on a fresh pool and on one whose share supply was burned
    /// down to zero.
    ///
    /// # Errors
    ///
    /// - [`AmmError::AlreadyInitialized`] if shares are still outstanding.
    /// - [`AmmError::InvalidQuantity`] if either amount is zero.
    pub fn initialize(
        &mut self,
        provider: AccountId,
        base_amount: Amount,
        asset_amount: Amount,
    ) -> Result<Shares, AmmError> {
        if self.initialized && !self.total_shares.is_zero() {
            return Err(AmmError::AlreadyInitialized);
        }
        if base_amount.is_zero() || asset_amount.is_zero() {
            return Err(AmmError::InvalidQuantity(
                "initial deposit requires both currencies",
            ));
        }
        let minted = Shares::new(base_amount.get());
        self.initialized = true;
        self.reserve_base = base_amount;
        self.reserve_asset = asset_amount;
        self.total_shares = minted;
        self.shares.insert(provider, minted);
        Ok(minted)
    }

    const fn reserves_for(&self, direction: TradeDirection) -> (Amount, Amount) {
        match direction {
            TradeDirection::BaseToAsset => (self.reserve_base, self.reserve_asset),
            TradeDirection::AssetToBase => (self.reserve_asset, self.reserve_base),
        }
    }

    fn ensure_tradable(&self) -> Result<(), AmmError> {
        if !self.initialized {
            return Err(AmmError::PoolNotInitialized);
        }
        if self.reserve_base.is_zero() || self.reserve_asset.is_zero() {
            return Err(AmmError::ZeroReserve);
        }
        Ok(())
    }

    /// Computes the exact-in swap output.
    ///
    /// Formula: `amount_out = reserve_out × net_input / (reserve_in + net_input)`
    ///
    /// A dust input may price to zero output; the leg is still valid.
    fn compute_exact_in(
        &self,
        direction: TradeDirection,
        amount_in: Amount,
    ) -> Result<SwapLeg, AmmError> {
        self.ensure_tradable()?;
        if amount_in.is_zero() {
            return Ok(SwapLeg::EMPTY);
        }
        let (reserve_in, reserve_out) = self.reserves_for(direction);

        let fee = self.fee_tier.fee_on(amount_in, Rounding::Up)?;
        let net_input = amount_in.safe_sub(&fee)?;

        let denominator = reserve_in
            .checked_add(&net_input)
            .ok_or(AmmError::Overflow("reserve_in + net_input overflow"))?;
        let amount_out = reserve_out.safe_mul_div(net_input.get(), denominator.get(), Rounding::Down)?;

        SwapLeg::new(amount_in, amount_out, fee)
    }

    /// Computes the exact-out swap: how much input is needed for `amount_out`.
    ///
    /// Formula: `amount_in_net = ceil(reserve_in × amount_out / (reserve_out − amount_out))`
    /// Then: `amount_in = ceil(amount_in_net × 10 000 / (10 000 − fee_bps))`
    fn compute_exact_out(
        &self,
        direction: TradeDirection,
        amount_out: Amount,
    ) -> Result<SwapLeg, AmmError> {
        self.ensure_tradable()?;
        if amount_out.is_zero() {
            return Ok(SwapLeg::EMPTY);
        }
        let (reserve_in, reserve_out) = self.reserves_for(direction);
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        let denom = reserve_out.safe_sub(&amount_out)?;
        let amount_in_net = reserve_in.safe_mul_div(amount_out.get(), denom.get(), Rounding::Up)?;

        let complement = BPS_DENOMINATOR
            .checked_sub(self.fee_tier.basis_points().as_u128())
            .ok_or(AmmError::InvalidFee("fee tier above 100%"))?;
        if complement == 0 {
            return Err(AmmError::InvalidFee("100% fee makes swap impossible"));
        }
        let amount_in = amount_in_net.safe_mul_div(BPS_DENOMINATOR, complement, Rounding::Up)?;
        // net of this fee is never below amount_in_net
        let fee = self.fee_tier.fee_on(amount_in, Rounding::Up)?;

        SwapLeg::new(amount_in, amount_out, fee)
    }

    fn apply(&mut self, direction: TradeDirection, leg: &SwapLeg) -> Result<(), AmmError> {
        match direction {
            TradeDirection::BaseToAsset => {
                self.reserve_base = self.reserve_base.safe_add(&leg.amount_in())?;
                self.reserve_asset = self.reserve_asset.safe_sub(&leg.amount_out())?;
                self.accumulated_fees_base = self.accumulated_fees_base.safe_add(&leg.fee())?;
            }
            TradeDirection::AssetToBase => {
                self.reserve_asset = self.reserve_asset.safe_add(&leg.amount_in())?;
                self.reserve_base = self.reserve_base.safe_sub(&leg.amount_out())?;
                self.accumulated_fees_asset = self.accumulated_fees_asset.safe_add(&leg.fee())?;
            }
        }
        debug!(
            %direction,
            amount_in = leg.amount_in().get(),
            amount_out = leg.amount_out().get(),
            fee = leg.fee().get(),
            reserve_base = self.reserve_base.get(),
            reserve_asset = self.reserve_asset.get(),
            "amm leg"
        );
        Ok(())
    }
}

impl FromConfig<ExchangeConfig> for ConstantProductPool {
    /// Creates an unseeded pool carrying the configured fee tier.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ExchangeConfig::validate`].
    fn from_config(config: &ExchangeConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            fee_tier: config.fee_tier(),
            initialized: false,
            reserve_base: Amount::ZERO,
            reserve_asset: Amount::ZERO,
            total_shares: Shares::ZERO,
            shares: BTreeMap::new(),
            accumulated_fees_base: Amount::ZERO,
            accumulated_fees_asset: Amount::ZERO,
        })
    }
}

impl SwapPool for ConstantProductPool {
    fn quote_exact_in(
        &self,
        direction: TradeDirection,
        amount_in: Amount,
    ) -> Result<SwapLeg, AmmError> {
        self.compute_exact_in(direction, amount_in)
    }

    fn quote_exact_out(
        &self,
        direction: TradeDirection,
        amount_out: Amount,
    ) -> Result<SwapLeg, AmmError> {
        self.compute_exact_out(direction, amount_out)
    }

    fn swap_exact_in(
        &mut self,
        direction: TradeDirection,
        amount_in: Amount,
    ) -> Result<SwapLeg, AmmError> {
        let leg = self.compute_exact_in(direction, amount_in)?;
        self.apply(direction, &leg)?;
        Ok(leg)
    }

    fn swap_exact_out(
        &mut self,
        direction: TradeDirection,
        amount_out: Amount,
    ) -> Result<SwapLeg, AmmError> {
        let leg = self.compute_exact_out(direction, amount_out)?;
        self.apply(direction, &leg)?;
        Ok(leg)
    }

    /// Gross input that moves the fee-adjusted marginal rate to `rate`.
    ///
    /// The marginal rate is `spot / (1 − fee)` asset per base when buying
    /// base and `spot × (1 − fee)` when selling it. The target reserve is
    /// solved on the fee-adjusted rate and the difference to the current
    /// reserve is returned as gross input. Returns zero if the curve is
    /// already at or past `rate`.
    fn input_to_reach(&self, direction: TradeDirection, rate: Price) -> Result<Amount, AmmError> {
        self.ensure_tradable()?;
        let k = self.invariant();
        let fee_bps = self.fee_tier.basis_points().as_u128();
        let complement = BPS_DENOMINATOR
            .checked_sub(fee_bps)
            .ok_or(AmmError::InvalidFee("fee tier above 100%"))?;

        let (target, current) = match direction {
            TradeDirection::AssetToBase => {
                let effective = mul_div(rate.get(), complement, BPS_DENOMINATOR, Rounding::Down)?;
                if effective == 0 {
                    return Ok(Amount::ZERO);
                }
                // spot = R_a² / k  ⇒  R_a = √(k × rate / WAD)
                (sqrt_mul_div(k, effective, Price::WAD)?, self.reserve_asset)
            }
            TradeDirection::BaseToAsset => {
                let effective = mul_div(rate.get(), BPS_DENOMINATOR, complement, Rounding::Up)?;
                // spot = k / R_b²  ⇒  R_b = √(k × WAD / rate)
                (sqrt_mul_div(k, Price::WAD, effective)?, self.reserve_base)
            }
        };
        Ok(Amount::new(target).saturating_sub(&current))
    }

    fn spot_price(&self) -> Result<Price, AmmError> {
        self.ensure_tradable()?;
        Price::from_reserves(self.reserve_asset, self.reserve_base)
    }

    fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }
}

impl LiquidityPool for ConstantProductPool {
    /// Adds liquidity at the current ratio.
    ///
    /// The asset side is `ceil(base × reserve_asset / reserve_base)` and
    /// minted shares are `floor(base × total_shares / reserve_base)`, so
    /// rounding never dilutes existing holders.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotInitialized`] if the pool was never seeded.
    /// - [`AmmError::ZeroReserve`] if the pool was drained.
    /// - [`AmmError::InvalidQuantity`] if `base` is zero or mints no shares.
    /// - [`AmmError::SlippageExceeded`] if the asset side exceeds `asset_max`.
    fn add_liquidity(
        &mut self,
        provider: AccountId,
        base: Amount,
        asset_max: Amount,
    ) -> Result<LiquidityReceipt, AmmError> {
        self.ensure_tradable()?;
        if base.is_zero() {
            return Err(AmmError::InvalidQuantity("liquidity deposit must be non-zero"));
        }
        let asset = base.safe_mul_div(
            self.reserve_asset.get(),
            self.reserve_base.get(),
            Rounding::Up,
        )?;
        if asset > asset_max {
            return Err(AmmError::SlippageExceeded("asset required above asset_max"));
        }
        let minted = Shares::new(mul_div(
            base.get(),
            self.total_shares.get(),
            self.reserve_base.get(),
            Rounding::Down,
        )?);
        if minted.is_zero() {
            return Err(AmmError::InvalidQuantity("deposit too small to mint shares"));
        }

        self.reserve_base = self.reserve_base.safe_add(&base)?;
        self.reserve_asset = self.reserve_asset.safe_add(&asset)?;
        self.total_shares = self.total_shares.safe_add(&minted)?;
        let held = self.shares_of(&provider).safe_add(&minted)?;
        self.shares.insert(provider, held);

        Ok(LiquidityReceipt {
            shares: minted,
            base,
            asset,
        })
    }

    /// Burns `shares` and pays `floor(reserve × shares / total_shares)`
    /// of each side.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotInitialized`] if the pool was never seeded.
    /// - [`AmmError::InvalidQuantity`] if `shares` is zero.
    /// - [`AmmError::InsufficientShares`] if `provider` holds fewer shares.
    /// - [`AmmError::SlippageExceeded`] if a payout is below its minimum.
    fn remove_liquidity(
        &mut self,
        provider: AccountId,
        shares: Shares,
        min_base: Amount,
        min_asset: Amount,
    ) -> Result<(Amount, Amount), AmmError> {
        if !self.initialized {
            return Err(AmmError::PoolNotInitialized);
        }
        if shares.is_zero() {
            return Err(AmmError::InvalidQuantity("cannot burn zero shares"));
        }
        let held = self.shares_of(&provider);
        if shares > held {
            return Err(AmmError::InsufficientShares {
                requested: shares.get(),
                available: held.get(),
            });
        }

        let total = self.total_shares.get();
        let out_base = self
            .reserve_base
            .safe_mul_div(shares.get(), total, Rounding::Down)?;
        let out_asset = self
            .reserve_asset
            .safe_mul_div(shares.get(), total, Rounding::Down)?;
        if out_base < min_base || out_asset < min_asset {
            return Err(AmmError::SlippageExceeded("payout below requested minimum"));
        }

        self.reserve_base = self.reserve_base.safe_sub(&out_base)?;
        self.reserve_asset = self.reserve_asset.safe_sub(&out_asset)?;
        self.total_shares = self.total_shares.safe_sub(&shares)?;
        let left = held.safe_sub(&shares)?;
        if left.is_zero() {
            self.shares.remove(&provider);
        } else {
            self.shares.insert(provider, left);
        }

        Ok((out_base, out_asset))
    }

    fn transfer_shares(
        &mut self,
        from: AccountId,
        to: AccountId,
        shares: Shares,
    ) -> Result<(), AmmError> {
        let held = self.shares_of(&from);
        if shares > held {
            return Err(AmmError::InsufficientShares {
                requested: shares.get(),
                available: held.get(),
            });
        }
        if shares.is_zero() || from == to {
            return Ok(());
        }
        let credited = self.shares_of(&to).safe_add(&shares)?;
        let left = held.safe_sub(&shares)?;
        if left.is_zero() {
            self.shares.remove(&from);
        } else {
            self.shares.insert(from, left);
        }
        self.shares.insert(to, credited);
        Ok(())
    }

    fn total_shares(&self) -> Shares {
        self.total_shares
    }

    fn shares_of(&self, holder: &AccountId) -> Shares {
        self.shares.get(holder).copied().unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BasisPoints;

    const WAD: u128 = Price::WAD;

    fn acct(i: u64) -> AccountId {
        AccountId::from_index(i)
    }

    fn make_pool(base: u128, asset: u128, fee_bps: u32) -> ConstantProductPool {
        let Ok(cfg) = ExchangeConfig::new(
            acct(99),
            BasisPoints::new(250),
            FeeTier::new(BasisPoints::new(fee_bps)),
            16,
        ) else {
            panic!("valid config");
        };
        let Ok(mut pool) = ConstantProductPool::from_config(&cfg) else {
            panic!("expected Ok");
        };
        let Ok(_) = pool.initialize(acct(1), Amount::new(base), Amount::new(asset)) else {
            panic!("expected seed");
        };
        pool
    }

    #[test]
    fn unseeded_pool_rejects_trades() {
        let cfg = ExchangeConfig::with_defaults(acct(99));
        let Ok(pool) = ConstantProductPool::from_config(&cfg) else {
            panic!("expected Ok");
        };
        assert!(!pool.is_initialized());
        assert_eq!(
            pool.quote_exact_in(TradeDirection::BaseToAsset, Amount::new(1)),
            Err(AmmError::PoolNotInitialized)
        );
        assert_eq!(pool.spot_price(), Err(AmmError::PoolNotInitialized));
    }

    #[test]
    fn initialize_mints_base_denominated_shares() {
        let pool = make_pool(10 * WAD, 100 * WAD, 0);
        assert_eq!(pool.total_shares(), Shares::new(10 * WAD));
        assert_eq!(pool.shares_of(&acct(1)), Shares::new(10 * WAD));
        let Ok(spot) = pool.spot_price() else {
            panic!("expected spot");
        };
        assert_eq!(spot.get(), 10 * WAD);
    }

    #[test]
    fn initialize_twice_rejected() {
        let mut pool = make_pool(10, 100, 0);
        assert_eq!(
            pool.initialize(acct(2), Amount::new(1), Amount::new(1)),
            Err(AmmError::AlreadyInitialized)
        );
    }

    #[test]
    fn initialize_zero_amount_rejected() {
        let cfg = ExchangeConfig::with_defaults(acct(99));
        let Ok(mut pool) = ConstantProductPool::from_config(&cfg) else {
            panic!("expected Ok");
        };
        let result = pool.initialize(acct(1), Amount::ZERO, Amount::new(5));
        assert!(matches!(result, Err(AmmError::InvalidQuantity(_))));
        assert!(!pool.is_initialized());
    }

    #[test]
    fn swap_exact_in_asset_to_base() {
        let mut pool = make_pool(10 * WAD, 100 * WAD, 0);
        let Ok(leg) = pool.swap_exact_in(TradeDirection::AssetToBase, Amount::new(10 * WAD)) else {
            panic!("expected Ok");
        };
        // 10 × 10 / 110
        assert_eq!(leg.amount_out(), Amount::new(909_090_909_090_909_090));
        assert_eq!(pool.reserve_asset(), Amount::new(110 * WAD));
        assert_eq!(
            pool.reserve_base(),
            Amount::new(10 * WAD - 909_090_909_090_909_090)
        );
    }

    #[test]
    fn swap_exact_in_dust_prices_to_zero() {
        let mut pool = make_pool(10, 1_000_000, 0);
        let Ok(leg) = pool.swap_exact_in(TradeDirection::AssetToBase, Amount::new(1)) else {
            panic!("expected Ok");
        };
        assert!(leg.amount_out().is_zero());
        assert_eq!(pool.reserve_asset(), Amount::new(1_000_001));
    }

    #[test]
    fn swap_exact_out_base_to_asset() {
        let mut pool = make_pool(1_000, 1_000, 30);
        let Ok(leg) = pool.swap_exact_out(TradeDirection::BaseToAsset, Amount::new(100)) else {
            panic!("expected Ok");
        };
        assert_eq!(leg.amount_out(), Amount::new(100));
        // net = ceil(1000 × 100 / 900) = 112, gross = ceil(112 × 10000 / 9970) = 113
        assert_eq!(leg.amount_in(), Amount::new(113));
        assert_eq!(pool.reserve_asset(), Amount::new(900));
    }

    #[test]
    fn swap_exact_out_equals_reserve_rejected() {
        let pool = make_pool(1_000, 1_000, 0);
        assert_eq!(
            pool.quote_exact_out(TradeDirection::AssetToBase, Amount::new(1_000)),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn invariant_never_decreases() {
        let mut pool = make_pool(1_000_000, 3_000_000, 30);
        let mut k = pool.invariant();
        for (direction, amount) in [
            (TradeDirection::BaseToAsset, 10_000),
            (TradeDirection::AssetToBase, 77_777),
            (TradeDirection::BaseToAsset, 3),
        ] {
            let Ok(_) = pool.swap_exact_in(direction, Amount::new(amount)) else {
                panic!("expected Ok");
            };
            assert!(pool.invariant() >= k);
            k = pool.invariant();
        }
        let Ok(_) = pool.swap_exact_out(TradeDirection::AssetToBase, Amount::new(5_000)) else {
            panic!("expected Ok");
        };
        assert!(pool.invariant() >= k);
    }

    #[test]
    fn fees_accumulate_on_input_side() {
        let mut pool = make_pool(1_000_000, 1_000_000, 30);
        let Ok(leg) = pool.swap_exact_in(TradeDirection::BaseToAsset, Amount::new(10_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(leg.fee(), Amount::new(30));
        assert_eq!(pool.accumulated_fees_base(), Amount::new(30));
        assert_eq!(pool.accumulated_fees_asset(), Amount::ZERO);
    }

    #[test]
    fn input_to_reach_lands_on_rate() {
        let pool = make_pool(10 * WAD, 100 * WAD, 0);
        let Ok(rate) = Price::new(10_250_000_000_000_000_000) else {
            panic!("valid price");
        };
        let Ok(reach) = pool.input_to_reach(TradeDirection::AssetToBase, rate) else {
            panic!("expected Ok");
        };
        // √(1000 × 10.25) − 100 ≈ 1.2423
        assert!(reach.get() > 1_242_000_000_000_000_000);
        assert!(reach.get() < 1_243_000_000_000_000_000);

        let mut moved = pool.clone();
        let Ok(_) = moved.swap_exact_in(TradeDirection::AssetToBase, reach) else {
            panic!("expected Ok");
        };
        let Ok(spot) = moved.spot_price() else {
            panic!("expected spot");
        };
        assert!(spot <= rate);
        assert!(rate.get() - spot.get() < 1_000_000_000);
    }

    #[test]
    fn input_to_reach_is_zero_when_past_rate() {
        let pool = make_pool(10 * WAD, 100 * WAD, 0);
        let Ok(rate) = Price::new(9 * WAD) else {
            panic!("valid price");
        };
        assert_eq!(
            pool.input_to_reach(TradeDirection::AssetToBase, rate),
            Ok(Amount::ZERO)
        );
        let Ok(above) = Price::new(11 * WAD) else {
            panic!("valid price");
        };
        assert_eq!(
            pool.input_to_reach(TradeDirection::BaseToAsset, above),
            Ok(Amount::ZERO)
        );
    }

    #[test]
    fn input_to_reach_on_deep_pool() {
        // k = 1e60 exceeds 2^193, so k × rate no longer fits 256 bits
        let e30 = 1_000_000_000_000_000_000_000_000_000_000u128;
        let mut pool = make_pool(e30, e30, 0);
        let Ok(rate) = Price::new(2 * WAD) else {
            panic!("valid price");
        };
        let Ok(reach) = pool.input_to_reach(TradeDirection::AssetToBase, rate) else {
            panic!("expected Ok on deep pool");
        };
        // √2 − 1 ≈ 0.4142 of the asset reserve
        assert!(reach.get() > 414 * e30 / 1_000);
        assert!(reach.get() < 415 * e30 / 1_000);
        let Ok(_) = pool.swap_exact_in(TradeDirection::AssetToBase, reach) else {
            panic!("expected swap");
        };
        let Ok(spot) = pool.spot_price() else {
            panic!("expected spot");
        };
        assert!(spot <= rate);
    }

    #[test]
    fn input_to_reach_shrinks_with_fee() {
        let free = make_pool(10 * WAD, 100 * WAD, 0);
        let charged = make_pool(10 * WAD, 100 * WAD, 30);
        let Ok(rate) = Price::new(9 * WAD) else {
            panic!("valid price");
        };
        let (Ok(a), Ok(b)) = (
            free.input_to_reach(TradeDirection::BaseToAsset, rate),
            charged.input_to_reach(TradeDirection::BaseToAsset, rate),
        ) else {
            panic!("expected Ok");
        };
        assert!(b < a);
    }

    // -- liquidity -----------------------------------------------------------

    #[test]
    fn add_then_remove_is_proportional() {
        let mut pool = make_pool(10 * WAD, 100 * WAD, 0);
        let Ok(receipt) = pool.add_liquidity(acct(2), Amount::new(10 * WAD), Amount::new(100 * WAD))
        else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.asset, Amount::new(100 * WAD));
        assert_eq!(receipt.shares, Shares::new(10 * WAD));
        assert_eq!(pool.total_shares(), Shares::new(20 * WAD));
        assert_eq!(pool.reserve_asset(), Amount::new(200 * WAD));

        let Ok((base, asset)) = pool.remove_liquidity(
            acct(2),
            Shares::new(10 * WAD),
            Amount::new(10 * WAD),
            Amount::new(100 * WAD),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(base, Amount::new(10 * WAD));
        assert_eq!(asset, Amount::new(100 * WAD));
        assert_eq!(pool.shares_of(&acct(2)), Shares::ZERO);
    }

    #[test]
    fn add_liquidity_asset_max_enforced() {
        let mut pool = make_pool(10, 100, 0);
        let before = pool.clone();
        let result = pool.add_liquidity(acct(2), Amount::new(1), Amount::new(9));
        assert!(matches!(result, Err(AmmError::SlippageExceeded(_))));
        assert_eq!(pool, before);
    }

    #[test]
    fn add_liquidity_rounds_asset_up() {
        let mut pool = make_pool(3, 10, 0);
        let Ok(receipt) = pool.add_liquidity(acct(2), Amount::new(1), Amount::new(4)) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.asset, Amount::new(4));
        assert_eq!(receipt.shares, Shares::new(1));
    }

    #[test]
    fn remove_more_than_held_rejected() {
        let mut pool = make_pool(10, 100, 0);
        let result = pool.remove_liquidity(acct(1), Shares::new(11), Amount::ZERO, Amount::ZERO);
        assert_eq!(
            result,
            Err(AmmError::InsufficientShares {
                requested: 11,
                available: 10
            })
        );
    }

    #[test]
    fn remove_below_minimum_rejected() {
        let mut pool = make_pool(10, 100, 0);
        let result = pool.remove_liquidity(acct(1), Shares::new(5), Amount::new(5), Amount::new(51));
        assert!(matches!(result, Err(AmmError::SlippageExceeded(_))));
    }

    #[test]
    fn drained_pool_can_be_seeded_again() {
        let mut pool = make_pool(10, 100, 0);
        let Ok(_) = pool.remove_liquidity(acct(1), Shares::new(10), Amount::ZERO, Amount::ZERO) else {
            panic!("expected Ok");
        };
        assert_eq!(pool.spot_price(), Err(AmmError::ZeroReserve));
        assert_eq!(
            pool.add_liquidity(acct(2), Amount::new(1), Amount::new(10)).map(|_| ()),
            Err(AmmError::ZeroReserve)
        );

        let Ok(minted) = pool.initialize(acct(2), Amount::new(20), Amount::new(50)) else {
            panic!("expected re-seed to succeed");
        };
        assert_eq!(minted, Shares::new(20));
        assert_eq!(pool.total_shares(), Shares::new(20));
        assert_eq!(pool.shares_of(&acct(1)), Shares::ZERO);
        assert_eq!(pool.shares_of(&acct(2)), Shares::new(20));
        assert_eq!(pool.reserve_base(), Amount::new(20));
        assert_eq!(pool.reserve_asset(), Amount::new(50));
    }

    #[test]
    fn seeded_pool_with_holders_rejects_initialize() {
        let mut pool = make_pool(10, 100, 0);
        let Ok(_) = pool.remove_liquidity(acct(1), Shares::new(4), Amount::ZERO, Amount::ZERO) else {
            panic!("expected Ok");
        };
        assert_eq!(
            pool.initialize(acct(2), Amount::new(1), Amount::new(1)),
            Err(AmmError::AlreadyInitialized)
        );
    }

    #[test]
    fn transfer_shares_moves_ownership() {
        let mut pool = make_pool(10, 100, 0);
        let Ok(()) = pool.transfer_shares(acct(1), acct(2), Shares::new(4)) else {
            panic!("expected Ok");
        };
        assert_eq!(pool.shares_of(&acct(1)), Shares::new(6));
        assert_eq!(pool.shares_of(&acct(2)), Shares::new(4));
        assert_eq!(pool.total_shares(), Shares::new(10));
        assert!(matches!(
            pool.transfer_shares(acct(2), acct(3), Shares::new(5)),
            Err(AmmError::InsufficientShares { .. })
        ));
    }
}
