//! A single fixed-price rung of the ladder.
//!
//! # Pricing
//!
//! A level converts at its immutable `rate` (asset per base, WAD-scaled):
//!
//! | Side | Reserve | Trader pays | Output for `x` in |
//! |------|---------|-------------|-------------------|
//! | Floor | asset | base | `floor(x × rate / WAD)` |
//! | Ceiling | base | asset | `floor(x × WAD / rate)` |
//!
//! Taking the whole reserve `R` costs `ceil` of the inverse conversion of
//! `R`; anything above that is returned as the remainder.
//!
//! # Allocation
//!
//! A fill is shared among depositors pro-rata to their live deposits,
//! walked in ascending [`AccountId`] order with cumulative rounding: the
//! `i`-th depositor's running share is `floor(cum_i × fill / reserve)`,
//! and they receive the increment over the previous running share. The
//! increments sum to exactly the fill, so no unit is ever lost or created.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{AccountId, Amount, CallContext, Currency, LevelSide, Price, Rounding};
use crate::error::AmmError;
use crate::ledger::Settlement;
use crate::math::mul_div;
use crate::traits::TokenLedger;

/// Immutable configuration shared by every level of one side.
///
/// The factory hands out a single `Arc<LevelTemplate>` per side; levels
/// differ only in their account, rate, and bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelTemplate {
    side: LevelSide,
    exchange: AccountId,
}

impl LevelTemplate {
    /// Creates a template for levels of `side` owned by `exchange`.
    #[must_use]
    pub const fn new(side: LevelSide, exchange: AccountId) -> Self {
        Self { side, exchange }
    }

    /// Side shared by all levels built from this template.
    #[must_use]
    pub const fn side(&self) -> LevelSide {
        self.side
    }

    /// Account of the exchange that created the levels.
    #[must_use]
    pub const fn exchange(&self) -> AccountId {
        self.exchange
    }
}

/// Where one account stands in a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionState {
    /// No live deposit and nothing to withdraw.
    NoPosition,
    /// Live deposit, nothing filled yet.
    Deposited,
    /// Live deposit and an accrued entitlement.
    PartiallyFilled,
    /// Deposit fully consumed; entitlement waiting to be withdrawn.
    Withdrawable,
}

/// Result of filling a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelFill {
    /// Input the level accepted.
    pub consumed: Amount,
    /// Reserve paid out.
    pub output: Amount,
    /// Input handed back: `requested − consumed`.
    pub remainder: Amount,
}

/// A fixed-price liquidity level.
///
/// Created empty by the [`LevelFactory`](crate::factory::LevelFactory),
/// funded by [`place_order`](Self::place_order), consumed by trades, and
/// paid out by [`withdraw`](Self::withdraw) /
/// [`approved_withdraw`](Self::approved_withdraw). Levels are never
/// destroyed.
///
/// # Invariants
///
/// - `reserve = Σ deposit_of(a)` over all depositors.
/// - `total_proceeds − total_withdrawn = Σ entitlement_of(a)`.
/// - The level's ledger account holds `reserve` of the reserve currency
///   and the outstanding entitlements of the other currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPriceLevel {
    template: Arc<LevelTemplate>,
    account: AccountId,
    rate: Price,
    reserve: Amount,
    deposits: BTreeMap<AccountId, Amount>,
    entitlements: BTreeMap<AccountId, Amount>,
    approved_withdrawers: BTreeMap<AccountId, AccountId>,
    total_deposited: Amount,
    total_filled: Amount,
    total_proceeds: Amount,
    total_withdrawn: Amount,
}

impl FixedPriceLevel {
    pub(crate) fn new(template: Arc<LevelTemplate>, account: AccountId, rate: Price) -> Self {
        Self {
            template,
            account,
            rate,
            reserve: Amount::ZERO,
            deposits: BTreeMap::new(),
            entitlements: BTreeMap::new(),
            approved_withdrawers: BTreeMap::new(),
            total_deposited: Amount::ZERO,
            total_filled: Amount::ZERO,
            total_proceeds: Amount::ZERO,
            total_withdrawn: Amount::ZERO,
        }
    }

    // -- accessors -----------------------------------------------------------

    /// Floor or ceiling.
    #[must_use]
    pub fn side(&self) -> LevelSide {
        self.template.side()
    }

    /// Shared template.
    #[must_use]
    pub fn template(&self) -> &Arc<LevelTemplate> {
        &self.template
    }

    /// Ledger account holding this level's funds.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.account
    }

    /// Fixed conversion rate.
    #[must_use]
    pub const fn rate(&self) -> Price {
        self.rate
    }

    /// Unfilled liquidity, in the reserve currency.
    pub const fn reserve(&self) -> Amount {
        self.reserve
    }

    /// Returns `true` once the reserve is fully consumed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.reserve.is_zero()
    }

    /// Currency depositors place.
    #[must_use]
    pub fn reserve_currency(&self) -> Currency {
        self.side().reserve_currency()
    }

    /// Currency traders pay and depositors withdraw.
    #[must_use]
    pub fn entitlement_currency(&self) -> Currency {
        self.side().entitlement_currency()
    }

    /// Live (unfilled) deposit of `account`.
    pub fn deposit_of(&self, account: &AccountId) -> Amount {
        self.deposits.get(account).copied().unwrap_or_default()
    }

    /// Withdrawable proceeds of `account`.
    pub fn entitlement_of(&self, account: &AccountId) -> Amount {
        self.entitlements.get(account).copied().unwrap_or_default()
    }

    /// Delegate allowed to withdraw on behalf of `depositor`.
    #[must_use]
    pub fn approved_withdrawer(&self, depositor: &AccountId) -> Option<AccountId> {
        self.approved_withdrawers.get(depositor).copied()
    }

    /// Lifetime deposits.
    pub const fn total_deposited(&self) -> Amount {
        self.total_deposited
    }

    /// Lifetime reserve paid out to traders.
    pub const fn total_filled(&self) -> Amount {
        self.total_filled
    }

    /// Lifetime input received from traders.
    pub const fn total_proceeds(&self) -> Amount {
        self.total_proceeds
    }

    /// Lifetime entitlement paid out to depositors.
    pub const fn total_withdrawn(&self) -> Amount {
        self.total_withdrawn
    }

    /// Accounts with a live deposit, in allocation order.
    pub fn depositors(&self) -> impl Iterator<Item = (&AccountId, &Amount)> {
        self.deposits.iter()
    }

    /// State-machine position of `account`.
    #[must_use]
    pub fn position_state(&self, account: &AccountId) -> PositionState {
        let live = !self.deposit_of(account).is_zero();
        let owed = !self.entitlement_of(account).is_zero();
        match (live, owed) {
            (false, false) => PositionState::NoPosition,
            (true, false) => PositionState::Deposited,
            (true, true) => PositionState::PartiallyFilled,
            (false, true) => PositionState::Withdrawable,
        }
    }

    // -- pricing -------------------------------------------------------------

    fn output_for(&self, input: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        match self.side() {
            LevelSide::Floor => self.rate.base_to_asset(input, rounding),
            LevelSide::Ceiling => self.rate.asset_to_base(input, rounding),
        }
    }

    fn input_for(&self, output: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        match self.side() {
            LevelSide::Floor => self.rate.asset_to_base(output, rounding),
            LevelSide::Ceiling => self.rate.base_to_asset(output, rounding),
        }
    }

    /// Input that buys the entire reserve.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the conversion overflows.
    pub fn capacity_in(&self) -> crate::error::Result<Amount> {
        self.input_for(self.reserve, Rounding::Up)
    }

    /// Prices selling `amount_in` into this level without mutating it.
    ///
    /// A remainder too small to buy one output unit is not consumed.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if a conversion overflows.
    pub fn quote_fill(&self, amount_in: Amount) -> crate::error::Result<LevelFill> {
        if self.reserve.is_zero() || amount_in.is_zero() {
            return Ok(LevelFill {
                remainder: amount_in,
                ..LevelFill::default()
            });
        }
        let capacity = self.capacity_in()?;
        let (consumed, output) = if amount_in >= capacity {
            (capacity, self.reserve)
        } else {
            let out = self.output_for(amount_in, Rounding::Down)?;
            if out.is_zero() {
                (Amount::ZERO, Amount::ZERO)
            } else {
                (amount_in, out)
            }
        };
        Ok(LevelFill {
            consumed,
            output,
            remainder: amount_in.saturating_sub(&consumed),
        })
    }

    /// Prices buying exactly `amount_out` from this level.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidity`] if `amount_out` exceeds the reserve.
    /// - [`AmmError::Overflow`] if the conversion overflows.
    pub fn quote_fill_exact_out(&self, amount_out: Amount) -> crate::error::Result<LevelFill> {
        if amount_out > self.reserve {
            return Err(AmmError::InsufficientLiquidity);
        }
        let consumed = self.input_for(amount_out, Rounding::Up)?;
        Ok(LevelFill {
            consumed,
            output: amount_out,
            remainder: Amount::ZERO,
        })
    }

    // -- state transitions ---------------------------------------------------

    /// Applies a priced fill: shrinks deposits, credits entitlements.
    fn apply_fill(&mut self, fill: &LevelFill) -> crate::error::Result<()> {
        if fill.output.is_zero() {
            return Ok(());
        }
        let reserve_before = self.reserve.get();
        let mut cumulative: u128 = 0;
        let mut prev_fill: u128 = 0;
        let mut prev_proceeds: u128 = 0;
        let mut shares = Vec::with_capacity(self.deposits.len());
        for (account, deposit) in &self.deposits {
            cumulative = cumulative
                .checked_add(deposit.get())
                .ok_or(AmmError::Overflow("level deposit sum overflow"))?;
            let fill_to = mul_div(cumulative, fill.output.get(), reserve_before, Rounding::Down)?;
            let proceeds_to =
                mul_div(cumulative, fill.consumed.get(), reserve_before, Rounding::Down)?;
            shares.push((
                *account,
                Amount::new(fill_to - prev_fill),
                Amount::new(proceeds_to - prev_proceeds),
            ));
            prev_fill = fill_to;
            prev_proceeds = proceeds_to;
        }

        for (account, taken, earned) in shares {
            let deposit = self.deposit_of(&account);
            let remaining = deposit
                .checked_sub(&taken)
                .ok_or(AmmError::Underflow("allocation exceeds deposit"))?;
            if remaining.is_zero() {
                self.deposits.remove(&account);
            } else {
                self.deposits.insert(account, remaining);
            }
            if !earned.is_zero() {
                let owed = self
                    .entitlement_of(&account)
                    .checked_add(&earned)
                    .ok_or(AmmError::Overflow("entitlement overflow"))?;
                self.entitlements.insert(account, owed);
            }
        }

        self.reserve = self
            .reserve
            .checked_sub(&fill.output)
            .ok_or(AmmError::Underflow("level reserve underflow"))?;
        self.total_filled = self
            .total_filled
            .checked_add(&fill.output)
            .ok_or(AmmError::Overflow("total filled overflow"))?;
        self.total_proceeds = self
            .total_proceeds
            .checked_add(&fill.consumed)
            .ok_or(AmmError::Overflow("total proceeds overflow"))?;
        debug!(
            side = %self.side(),
            rate = %self.rate,
            consumed = fill.consumed.get(),
            output = fill.output.get(),
            reserve = self.reserve.get(),
            "level filled"
        );
        Ok(())
    }

    /// Fills with up to `amount_in` without settling. The caller moves funds.
    pub(crate) fn fill(&mut self, amount_in: Amount) -> crate::error::Result<LevelFill> {
        let fill = self.quote_fill(amount_in)?;
        self.apply_fill(&fill)?;
        Ok(fill)
    }

    /// Fills exactly `amount_out` without settling. The caller moves funds.
    pub(crate) fn fill_exact_out(&mut self, amount_out: Amount) -> crate::error::Result<LevelFill> {
        let fill = self.quote_fill_exact_out(amount_out)?;
        self.apply_fill(&fill)?;
        Ok(fill)
    }

    /// Runs `op`, then settles; restores the prior state if either fails.
    fn transact<L, T, F>(&mut self, ledger: &mut L, op: F) -> crate::error::Result<T>
    where
        L: TokenLedger + ?Sized,
        F: FnOnce(&mut Self, &mut Settlement) -> crate::error::Result<T>,
    {
        let snapshot = self.clone();
        let mut settlement = Settlement::new();
        let result = op(self, &mut settlement).and_then(|value| {
            settlement.execute(ledger)?;
            Ok(value)
        });
        if let Err(err) = &result {
            warn!(side = %snapshot.side(), rate = %snapshot.rate, %err, "level operation rolled back");
            *self = snapshot;
        }
        result
    }

    /// Deposits `amount` of the reserve currency from the caller.
    ///
    /// The level pulls the funds, so the caller must have approved the
    /// level's account. A `Some` withdrawer replaces the caller's delegate;
    /// `None` leaves any existing delegate in place.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount` is zero.
    /// - [`AmmError::InsufficientAllowance`] / [`AmmError::InsufficientBalance`]
    ///   if the pull fails.
    pub fn place_order<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        withdrawer: Option<AccountId>,
        ledger: &mut L,
    ) -> crate::error::Result<()> {
        if amount.is_zero() {
            return Err(AmmError::InvalidQuantity("order amount must be non-zero"));
        }
        self.transact(ledger, |level, settlement| {
            let deposit = level
                .deposit_of(&ctx.sender)
                .checked_add(&amount)
                .ok_or(AmmError::Overflow("deposit overflow"))?;
            level.reserve = level
                .reserve
                .checked_add(&amount)
                .ok_or(AmmError::Overflow("level reserve overflow"))?;
            level.total_deposited = level
                .total_deposited
                .checked_add(&amount)
                .ok_or(AmmError::Overflow("total deposited overflow"))?;
            level.deposits.insert(ctx.sender, deposit);
            if let Some(delegate) = withdrawer {
                level.approved_withdrawers.insert(ctx.sender, delegate);
            }
            settlement.pull(
                level.reserve_currency(),
                level.account,
                ctx.sender,
                level.account,
                amount,
            );
            Ok(())
        })?;
        info!(
            side = %self.side(),
            rate = %self.rate,
            depositor = %ctx.sender,
            amount = amount.get(),
            "order placed"
        );
        Ok(())
    }

    /// Sells up to `amount_in` of the entitlement currency directly into
    /// this level, paying the output to `recipient`.
    ///
    /// The caller must have approved the level's account for the input.
    /// Returns the fill; its `remainder` is the unconsumed input, which is
    /// never pulled.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount_in` is zero.
    /// - Ledger errors if the pull fails.
    pub fn trade<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        recipient: AccountId,
        amount_in: Amount,
        ledger: &mut L,
    ) -> crate::error::Result<LevelFill> {
        if amount_in.is_zero() {
            return Err(AmmError::InvalidQuantity("trade amount must be non-zero"));
        }
        self.transact(ledger, |level, settlement| {
            let fill = level.fill(amount_in)?;
            settlement
                .pull(
                    level.entitlement_currency(),
                    level.account,
                    ctx.sender,
                    level.account,
                    fill.consumed,
                )
                .push(level.reserve_currency(), level.account, recipient, fill.output);
            Ok(fill)
        })
    }

    /// Withdraws `amount` of the caller's entitlement to the caller.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount` is zero.
    /// - [`AmmError::InsufficientEntitlement`] if `amount` exceeds the entitlement.
    pub fn withdraw<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        ledger: &mut L,
    ) -> crate::error::Result<()> {
        self.pay_out(ctx.sender, amount, ledger)
    }

    /// Withdraws `amount` of `on_behalf_of`'s entitlement, triggered by
    /// their approved delegate. Funds go to the depositor, not the delegate.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Unauthorized`] if the caller is not the delegate.
    /// - Same as [`withdraw`](Self::withdraw) otherwise.
    pub fn approved_withdraw<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        on_behalf_of: AccountId,
        ledger: &mut L,
    ) -> crate::error::Result<()> {
        if self.approved_withdrawer(&on_behalf_of) != Some(ctx.sender) {
            return Err(AmmError::Unauthorized(
                "caller is not the approved withdrawer",
            ));
        }
        self.pay_out(on_behalf_of, amount, ledger)
    }

    fn pay_out<L: TokenLedger + ?Sized>(
        &mut self,
        depositor: AccountId,
        amount: Amount,
        ledger: &mut L,
    ) -> crate::error::Result<()> {
        if amount.is_zero() {
            return Err(AmmError::InvalidQuantity("withdraw amount must be non-zero"));
        }
        let available = self.entitlement_of(&depositor);
        if amount > available {
            return Err(AmmError::InsufficientEntitlement {
                requested: amount.get(),
                available: available.get(),
            });
        }
        self.transact(ledger, |level, settlement| {
            let left = available.saturating_sub(&amount);
            if left.is_zero() {
                level.entitlements.remove(&depositor);
            } else {
                level.entitlements.insert(depositor, left);
            }
            level.total_withdrawn = level
                .total_withdrawn
                .checked_add(&amount)
                .ok_or(AmmError::Overflow("total withdrawn overflow"))?;
            settlement.push(level.entitlement_currency(), level.account, depositor, amount);
            Ok(())
        })?;
        info!(
            side = %self.side(),
            rate = %self.rate,
            %depositor,
            amount = amount.get(),
            "entitlement withdrawn"
        );
        Ok(())
    }
}
