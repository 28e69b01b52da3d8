//! The hybrid exchange: AMM reserves, LP shares, and the level ladder.

use tracing::{info, warn};

use super::router;
use crate::config::ExchangeConfig;
use crate::domain::{
    AccountId, Amount, BasisPoints, CallContext, Currency, LevelSide, Price, Shares, Timestamp,
    TradeDirection, TradeOutcome, TradeSpec,
};
use crate::error::AmmError;
use crate::factory::LevelFactory;
use crate::ladder::PriceLadder;
use crate::ledger::Settlement;
use crate::levels::FixedPriceLevel;
use crate::pools::ConstantProductPool;
use crate::traits::{FromConfig, LiquidityPool, LiquidityReceipt, SwapPool, TokenLedger};

/// A constant-product pool with a ladder of fixed-price levels on each
/// side of its spot price.
///
/// The exchange custodies the AMM reserves in its configured ledger
/// account. Levels custody their own funds in accounts derived by the
/// [`LevelFactory`]. Callers must approve the exchange account for
/// anything the exchange pulls from them.
///
/// # Atomicity
///
/// Every mutating entry point snapshots the exchange, applies its state
/// changes, then settles all ledger transfers as one validated batch. On
/// any error the snapshot is restored and the ledger is untouched.
///
/// # Example
///
/// ```rust
/// use hydra_ladder::config::ExchangeConfig;
/// use hydra_ladder::domain::{AccountId, Amount, CallContext, Currency, Price, Timestamp};
/// use hydra_ladder::exchange::Exchange;
/// use hydra_ladder::ledger::MemoryLedger;
/// use hydra_ladder::traits::TokenLedger;
///
/// const WAD: u128 = Price::WAD;
/// let (house, alice) = (AccountId::from_index(1), AccountId::from_index(2));
/// let mut ledger = MemoryLedger::new();
/// for currency in [Currency::Base, Currency::Asset] {
///     ledger.mint(currency, alice, Amount::new(1_000 * WAD)).expect("mint");
///     ledger.approve(currency, alice, house, Amount::MAX).expect("approve");
/// }
///
/// let mut exchange = Exchange::new(ExchangeConfig::with_defaults(house)).expect("valid");
/// let ctx = CallContext::new(alice, Timestamp::new(0));
/// exchange
///     .initialize(&ctx, Amount::new(100 * WAD), Amount::new(10 * WAD), &mut ledger)
///     .expect("seeded");
///
/// let outcome = exchange
///     .asset_to_base_input(&ctx, Amount::new(10 * WAD), Amount::ZERO, Timestamp::MAX, alice, &mut ledger)
///     .expect("trade");
/// assert_eq!(outcome.amount_in(), Amount::new(10 * WAD));
/// assert!(outcome.amount_out() < Amount::new(WAD));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    config: ExchangeConfig,
    pool: ConstantProductPool,
    ladder: Option<PriceLadder>,
}

impl FromConfig<ExchangeConfig> for Exchange {
    /// Creates an unseeded exchange.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ExchangeConfig::validate`].
    fn from_config(config: &ExchangeConfig) -> Result<Self, AmmError> {
        Ok(Self {
            config: *config,
            pool: ConstantProductPool::from_config(config)?,
            ladder: None,
        })
    }
}

impl Exchange {
    /// Creates an unseeded exchange from `config`.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ExchangeConfig::validate`].
    pub fn new(config: ExchangeConfig) -> Result<Self, AmmError> {
        Self::from_config(&config)
    }

    // -- accessors -----------------------------------------------------------

    /// The exchange configuration.
    #[must_use]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Ledger account custodying the AMM reserves.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.config.account()
    }

    /// Rung spacing in basis points.
    #[must_use]
    pub const fn price_spread(&self) -> BasisPoints {
        self.config.price_spread()
    }

    /// The underlying constant-product pool.
    #[must_use]
    pub const fn pool(&self) -> &ConstantProductPool {
        &self.pool
    }

    /// The ladder, once the exchange is initialized.
    #[must_use]
    pub const fn ladder(&self) -> Option<&PriceLadder> {
        self.ladder.as_ref()
    }

    /// Returns `true` once [`initialize`](Self::initialize) has succeeded.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.ladder.is_some()
    }

    fn ladder_ref(&self) -> Result<&PriceLadder, AmmError> {
        self.ladder.as_ref().ok_or(AmmError::PoolNotInitialized)
    }

    fn ladder_mut(&mut self) -> Result<&mut PriceLadder, AmmError> {
        self.ladder.as_mut().ok_or(AmmError::PoolNotInitialized)
    }

    /// AMM base reserve.
    pub const fn reserve_base(&self) -> Amount {
        self.pool.reserve_base()
    }

    /// AMM asset reserve.
    pub const fn reserve_asset(&self) -> Amount {
        self.pool.reserve_asset()
    }

    /// Outstanding LP shares.
    #[must_use]
    pub fn total_shares(&self) -> Shares {
        self.pool.total_shares()
    }

    /// LP shares held by `holder`.
    #[must_use]
    pub fn shares_of(&self, holder: &AccountId) -> Shares {
        self.pool.shares_of(holder)
    }

    /// AMM spot price, asset per base.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotInitialized`] before initialization.
    /// - [`AmmError::ZeroReserve`] if the pool was drained.
    pub fn spot_price(&self) -> Result<Price, AmmError> {
        self.pool.spot_price()
    }

    /// Active ceiling price.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotInitialized`] before initialization.
    pub fn current_ceiling_price(&self) -> Result<Price, AmmError> {
        Ok(self.ladder_ref()?.current_ceiling_price())
    }

    /// Active floor price.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotInitialized`] before initialization.
    pub fn current_floor_price(&self) -> Result<Price, AmmError> {
        Ok(self.ladder_ref()?.current_floor_price())
    }

    /// Ceiling level at `price`, if one exists.
    #[must_use]
    pub fn ceiling(&self, price: Price) -> Option<&FixedPriceLevel> {
        self.ladder.as_ref()?.ceiling(price)
    }

    /// Floor level at `price`, if one exists.
    #[must_use]
    pub fn floor(&self, price: Price) -> Option<&FixedPriceLevel> {
        self.ladder.as_ref()?.floor(price)
    }

    /// Mutable level at (`side`, `price`), for placing orders and
    /// withdrawing.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotInitialized`] before initialization.
    /// - [`AmmError::LevelNotFound`] if no level exists at `price`.
    pub fn level_mut(
        &mut self,
        side: LevelSide,
        price: Price,
    ) -> Result<&mut FixedPriceLevel, AmmError> {
        self.ladder_mut()?
            .level_mut(side, price)
            .ok_or(AmmError::LevelNotFound(price.get()))
    }

    /// Mutable ceiling level at `price`.
    ///
    /// # Errors
    ///
    /// Same as [`level_mut`](Self::level_mut).
    pub fn ceiling_mut(&mut self, price: Price) -> Result<&mut FixedPriceLevel, AmmError> {
        self.level_mut(LevelSide::Ceiling, price)
    }

    /// Mutable floor level at `price`.
    ///
    /// # Errors
    ///
    /// Same as [`level_mut`](Self::level_mut).
    pub fn floor_mut(&mut self, price: Price) -> Result<&mut FixedPriceLevel, AmmError> {
        self.level_mut(LevelSide::Floor, price)
    }

    // -- ladder --------------------------------------------------------------

    /// Creates the ceiling level one step above the active ceiling.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotInitialized`] before initialization.
    /// - [`AmmError::LevelExists`] / [`AmmError::NonContiguousLevel`] from
    ///   [`PriceLadder::add_level`].
    pub fn add_ceiling_level(&mut self, price: Price) -> Result<&FixedPriceLevel, AmmError> {
        Ok(&*self.ladder_mut()?.add_ceiling_level(price)?)
    }

    /// Creates the floor level one step below the active floor.
    ///
    /// # Errors
    ///
    /// Same as [`add_ceiling_level`](Self::add_ceiling_level).
    pub fn add_floor_level(&mut self, price: Price) -> Result<&FixedPriceLevel, AmmError> {
        Ok(&*self.ladder_mut()?.add_floor_level(price)?)
    }

    // -- atomic wrapper ------------------------------------------------------

    fn transact<L, T, F>(
        &mut self,
        op_name: &'static str,
        ledger: &mut L,
        op: F,
    ) -> Result<T, AmmError>
    where
        L: TokenLedger + ?Sized,
        F: FnOnce(&mut Self, &mut Settlement) -> Result<T, AmmError>,
    {
        let snapshot = self.clone();
        let mut settlement = Settlement::new();
        let result = op(self, &mut settlement).and_then(|value| {
            settlement.execute(ledger)?;
            Ok(value)
        });
        if let Err(err) = &result {
            warn!(op = op_name, %err, "exchange operation rolled back");
            *self = snapshot;
        }
        result
    }

    // -- liquidity -----------------------------------------------------------

    /// Seeds the pool and the ladder.
    ///
    /// Mints `base_amount` shares to the caller, pulls both amounts from
    /// the caller, and creates one empty rung a step above and a step
    /// below the resulting spot price.
    ///
    /// A pool whose shares were all burned may be seeded again. The
    /// existing ladder and its deposits are kept; any active rung the new
    /// spot has passed is walked outward until spot is bracketed again.
    ///
    /// # Errors
    ///
    /// - [`AmmError::AlreadyInitialized`] while shares are outstanding.
    /// - [`AmmError::InvalidQuantity`] if either amount is zero.
    /// - [`AmmError::InvalidPrice`] if the seed ratio prices to zero.
    /// - Ledger errors if the pulls fail.
    pub fn initialize<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        asset_amount: Amount,
        base_amount: Amount,
        ledger: &mut L,
    ) -> Result<Shares, AmmError> {
        let shares = self.transact("initialize", ledger, |ex, settlement| {
            let shares = ex.pool.initialize(ctx.sender, base_amount, asset_amount)?;
            let spot = ex.pool.spot_price()?;
            match ex.ladder.as_mut() {
                Some(ladder) => {
                    for side in [LevelSide::Ceiling, LevelSide::Floor] {
                        ladder.advance_past(side, spot);
                    }
                }
                None => {
                    ex.ladder = Some(PriceLadder::new(
                        LevelFactory::new(ex.account()),
                        ex.config.price_spread(),
                        spot,
                    )?);
                }
            }
            let house = ex.account();
            settlement
                .pull(Currency::Asset, house, ctx.sender, house, asset_amount)
                .pull(Currency::Base, house, ctx.sender, house, base_amount);
            Ok(shares)
        })?;
        info!(
            provider = %ctx.sender,
            base = base_amount.get(),
            asset = asset_amount.get(),
            shares = shares.get(),
            "exchange initialized"
        );
        Ok(shares)
    }

    /// Deposits `base_amount` plus the proportional asset amount.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DeadlineExceeded`] if `ctx.now` is past `deadline`.
    /// - [`AmmError::PoolNotInitialized`] before initialization.
    /// - [`AmmError::SlippageExceeded`] if the asset side exceeds `asset_max`.
    /// - Ledger errors if the pulls fail.
    pub fn add_liquidity<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        base_amount: Amount,
        asset_max: Amount,
        deadline: Timestamp,
        ledger: &mut L,
    ) -> Result<LiquidityReceipt, AmmError> {
        ctx.check_deadline(deadline)?;
        self.ladder_ref()?;
        let receipt = self.transact("add_liquidity", ledger, |ex, settlement| {
            let receipt = ex.pool.add_liquidity(ctx.sender, base_amount, asset_max)?;
            let house = ex.account();
            settlement
                .pull(Currency::Base, house, ctx.sender, house, receipt.base)
                .pull(Currency::Asset, house, ctx.sender, house, receipt.asset);
            Ok(receipt)
        })?;
        info!(
            provider = %ctx.sender,
            base = receipt.base.get(),
            asset = receipt.asset.get(),
            shares = receipt.shares.get(),
            "liquidity added"
        );
        Ok(receipt)
    }

    /// Burns `shares` and pays the caller their proportional reserves.
    ///
    /// Returns `(base, asset)` paid out.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DeadlineExceeded`] if `ctx.now` is past `deadline`.
    /// - [`AmmError::InsufficientShares`] if the caller holds fewer shares.
    /// - [`AmmError::SlippageExceeded`] if a payout is below its minimum.
    pub fn remove_liquidity<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        shares: Shares,
        min_base: Amount,
        min_asset: Amount,
        deadline: Timestamp,
        ledger: &mut L,
    ) -> Result<(Amount, Amount), AmmError> {
        ctx.check_deadline(deadline)?;
        self.ladder_ref()?;
        let (base, asset) = self.transact("remove_liquidity", ledger, |ex, settlement| {
            let (base, asset) = ex
                .pool
                .remove_liquidity(ctx.sender, shares, min_base, min_asset)?;
            let house = ex.account();
            settlement
                .push(Currency::Base, house, ctx.sender, base)
                .push(Currency::Asset, house, ctx.sender, asset);
            Ok((base, asset))
        })?;
        info!(
            provider = %ctx.sender,
            shares = shares.get(),
            base = base.get(),
            asset = asset.get(),
            "liquidity removed"
        );
        Ok((base, asset))
    }

    /// Moves LP shares from the caller to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientShares`] if the caller holds fewer.
    pub fn transfer_shares(
        &mut self,
        ctx: &CallContext,
        to: AccountId,
        shares: Shares,
    ) -> Result<(), AmmError> {
        self.pool.transfer_shares(ctx.sender, to, shares)
    }

    // -- trading -------------------------------------------------------------

    /// Sells exactly `base_in` for at least `min_asset_out`, paid to `recipient`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn base_to_asset_input<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        base_in: Amount,
        min_asset_out: Amount,
        deadline: Timestamp,
        recipient: AccountId,
        ledger: &mut L,
    ) -> Result<TradeOutcome, AmmError> {
        let spec = TradeSpec::exact_in(base_in, min_asset_out)?;
        self.execute(ctx, TradeDirection::BaseToAsset, spec, deadline, recipient, ledger)
    }

    /// Buys exactly `asset_out` for `recipient`, paying at most `max_base_in`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn base_to_asset_output<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        asset_out: Amount,
        max_base_in: Amount,
        deadline: Timestamp,
        recipient: AccountId,
        ledger: &mut L,
    ) -> Result<TradeOutcome, AmmError> {
        let spec = TradeSpec::exact_out(asset_out, max_base_in)?;
        self.execute(ctx, TradeDirection::BaseToAsset, spec, deadline, recipient, ledger)
    }

    /// Sells exactly `asset_in` for at least `min_base_out`, paid to `recipient`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn asset_to_base_input<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        asset_in: Amount,
        min_base_out: Amount,
        deadline: Timestamp,
        recipient: AccountId,
        ledger: &mut L,
    ) -> Result<TradeOutcome, AmmError> {
        let spec = TradeSpec::exact_in(asset_in, min_base_out)?;
        self.execute(ctx, TradeDirection::AssetToBase, spec, deadline, recipient, ledger)
    }

    /// Buys exactly `base_out` for `recipient`, paying at most `max_asset_in`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn asset_to_base_output<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        base_out: Amount,
        max_asset_in: Amount,
        deadline: Timestamp,
        recipient: AccountId,
        ledger: &mut L,
    ) -> Result<TradeOutcome, AmmError> {
        let spec = TradeSpec::exact_out(base_out, max_asset_in)?;
        self.execute(ctx, TradeDirection::AssetToBase, spec, deadline, recipient, ledger)
    }

    /// Routes a trade through the ladder and the AMM, then settles it.
    ///
    /// The caller pays the input; `recipient` receives the output. AMM
    /// legs settle against the exchange account and rung fills against
    /// each level's account.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DeadlineExceeded`] if `ctx.now` is past `deadline`.
    /// - [`AmmError::PoolNotInitialized`] before initialization.
    /// - [`AmmError::InsufficientLiquidity`] if nothing can be paid out.
    /// - [`AmmError::SlippageExceeded`] if the combined result violates `spec`.
    /// - Ledger errors if settlement fails.
    pub fn execute<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        direction: TradeDirection,
        spec: TradeSpec,
        deadline: Timestamp,
        recipient: AccountId,
        ledger: &mut L,
    ) -> Result<TradeOutcome, AmmError> {
        ctx.check_deadline(deadline)?;
        self.ladder_ref()?;
        let max_rungs = self.config.max_rungs_per_trade();
        let outcome = self.transact("trade", ledger, |ex, settlement| {
            let ladder = ex.ladder.as_mut().ok_or(AmmError::PoolNotInitialized)?;
            let outcome = router::route(&mut ex.pool, ladder, direction, &spec, max_rungs)?;

            let house = ex.config.account();
            let (input, output) = (direction.input_currency(), direction.output_currency());
            let side = direction.level_side();
            settlement.pull(input, house, ctx.sender, house, outcome.amm_in());
            for fill in outcome.fills() {
                let level = ladder.factory().level_account(side, fill.price);
                settlement
                    .pull(input, house, ctx.sender, level, fill.amount_in)
                    .push(output, level, recipient, fill.amount_out);
            }
            settlement.push(output, house, recipient, outcome.amm_out());
            Ok(outcome)
        })?;
        info!(
            trader = %ctx.sender,
            %recipient,
            %direction,
            amount_in = outcome.amount_in().get(),
            amount_out = outcome.amount_out().get(),
            fills = outcome.fills().len(),
            "trade executed"
        );
        Ok(outcome)
    }

    // -- quotes --------------------------------------------------------------

    /// Prices `spec` without changing any state.
    ///
    /// Runs the same routing and checks as [`execute`](Self::execute) on a
    /// scratch copy; only settlement is skipped.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute), minus deadline and ledger errors.
    pub fn quote(&self, direction: TradeDirection, spec: TradeSpec) -> Result<TradeOutcome, AmmError> {
        let mut pool = self.pool.clone();
        let mut ladder = self.ladder_ref()?.clone();
        router::route(
            &mut pool,
            &mut ladder,
            direction,
            &spec,
            self.config.max_rungs_per_trade(),
        )
    }

    /// Quote for [`base_to_asset_input`](Self::base_to_asset_input).
    ///
    /// # Errors
    ///
    /// Same as [`quote`](Self::quote).
    pub fn quote_base_to_asset_input(&self, base_in: Amount) -> Result<TradeOutcome, AmmError> {
        self.quote(TradeDirection::BaseToAsset, TradeSpec::exact_in(base_in, Amount::ZERO)?)
    }

    /// Quote for [`base_to_asset_output`](Self::base_to_asset_output).
    ///
    /// # Errors
    ///
    /// Same as [`quote`](Self::quote).
    pub fn quote_base_to_asset_output(&self, asset_out: Amount) -> Result<TradeOutcome, AmmError> {
        self.quote(TradeDirection::BaseToAsset, TradeSpec::exact_out(asset_out, Amount::MAX)?)
    }

    /// Quote for [`asset_to_base_input`](Self::asset_to_base_input).
    ///
    /// # Errors
    ///
    /// Same as [`quote`](Self::quote).
    pub fn quote_asset_to_base_input(&self, asset_in: Amount) -> Result<TradeOutcome, AmmError> {
        self.quote(TradeDirection::AssetToBase, TradeSpec::exact_in(asset_in, Amount::ZERO)?)
    }

    /// Quote for [`asset_to_base_output`](Self::asset_to_base_output).
    ///
    /// # Errors
    ///
    /// Same as [`quote`](Self::quote).
    pub fn quote_asset_to_base_output(&self, base_out: Amount) -> Result<TradeOutcome, AmmError> {
        self.quote(TradeDirection::AssetToBase, TradeSpec::exact_out(base_out, Amount::MAX)?)
    }
}
