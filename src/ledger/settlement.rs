//! Batched ledger transfers, validated before any of them is applied.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{AccountId, Amount, Currency};
use crate::error::AmmError;
use crate::traits::TokenLedger;

/// A single movement of funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transfer {
    /// Currency moved.
    pub currency: Currency,
    /// Account debited.
    pub from: AccountId,
    /// Account credited.
    pub to: AccountId,
    /// Quantity moved.
    pub amount: Amount,
    /// Account pulling on `from`'s allowance, or `None` for a direct push.
    pub spender: Option<AccountId>,
}

/// The ledger side effects of one exchange or level operation.
///
/// Operations update their own state first, collect every transfer they
/// need here, and call [`execute`](Self::execute) last. Execution first
/// replays the whole batch against simulated balances and allowances and
/// only touches the ledger if every transfer would succeed, so a failing
/// settlement leaves the ledger untouched.
///
/// Zero-amount transfers are dropped when recorded.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{AccountId, Amount, Currency};
/// use hydra_ladder::ledger::{MemoryLedger, Settlement};
/// use hydra_ladder::traits::TokenLedger;
///
/// let (alice, pool) = (AccountId::from_index(1), AccountId::from_index(2));
/// let mut ledger = MemoryLedger::new();
/// ledger.mint(Currency::Asset, alice, Amount::new(10)).expect("mint");
///
/// let mut batch = Settlement::new();
/// batch.pull(Currency::Asset, pool, alice, pool, Amount::new(10));
/// // no allowance granted yet
/// assert!(batch.clone().execute(&mut ledger).is_err());
///
/// ledger.approve(Currency::Asset, alice, pool, Amount::new(10)).expect("approve");
/// assert!(batch.execute(&mut ledger).is_ok());
/// assert_eq!(ledger.balance_of(Currency::Asset, &pool), Amount::new(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    transfers: Vec<Transfer>,
}

impl Settlement {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `spender` pulling `amount` from `owner` into `to`.
    pub fn pull(
        &mut self,
        currency: Currency,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> &mut Self {
        if !amount.is_zero() {
            self.transfers.push(Transfer {
                currency,
                from: owner,
                to,
                amount,
                spender: Some(spender),
            });
        }
        self
    }

    /// Records `from` pushing `amount` to `to`.
    pub fn push(
        &mut self,
        currency: Currency,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> &mut Self {
        if !amount.is_zero() {
            self.transfers.push(Transfer {
                currency,
                from,
                to,
                amount,
                spender: None,
            });
        }
        self
    }

    /// Recorded transfers, in execution order.
    #[must_use]
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Returns `true` if nothing would move.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Replays the batch against simulated state without mutating `ledger`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if a pull exceeds its allowance.
    /// - [`AmmError::InsufficientBalance`] if a debit exceeds the running balance.
    /// - [`AmmError::Overflow`] if a credit overflows.
    pub fn validate<L: TokenLedger + ?Sized>(&self, ledger: &L) -> Result<(), AmmError> {
        let mut balances: BTreeMap<(Currency, AccountId), Amount> = BTreeMap::new();
        let mut allowances: BTreeMap<(Currency, AccountId, AccountId), Amount> = BTreeMap::new();

        for t in &self.transfers {
            if let Some(spender) = t.spender {
                let key = (t.currency, t.from, spender);
                let allowed = *allowances
                    .entry(key)
                    .or_insert_with(|| ledger.allowance(t.currency, &t.from, &spender));
                if t.amount > allowed {
                    return Err(AmmError::InsufficientAllowance(
                        "settlement pull exceeds allowance",
                    ));
                }
                if allowed != Amount::MAX {
                    allowances.insert(key, allowed.saturating_sub(&t.amount));
                }
            }

            let from_balance = *balances
                .entry((t.currency, t.from))
                .or_insert_with(|| ledger.balance_of(t.currency, &t.from));
            let debited = from_balance
                .checked_sub(&t.amount)
                .ok_or(AmmError::InsufficientBalance("settlement debit exceeds balance"))?;
            balances.insert((t.currency, t.from), debited);

            let to_balance = *balances
                .entry((t.currency, t.to))
                .or_insert_with(|| ledger.balance_of(t.currency, &t.to));
            let credited = to_balance
                .checked_add(&t.amount)
                .ok_or(AmmError::Overflow("settlement credit overflow"))?;
            balances.insert((t.currency, t.to), credited);
        }
        Ok(())
    }

    /// Validates the batch, then applies it in order.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, in which case the ledger is
    /// untouched, or propagates a ledger error.
    pub fn execute<L: TokenLedger + ?Sized>(self, ledger: &mut L) -> Result<(), AmmError> {
        self.validate(ledger)?;
        for t in self.transfers {
            debug!(
                currency = %t.currency,
                from = %t.from,
                to = %t.to,
                amount = t.amount.get(),
                pulled = t.spender.is_some(),
                "ledger transfer"
            );
            match t.spender {
                Some(spender) => ledger.transfer_from(t.currency, spender, t.from, t.to, t.amount)?,
                None => ledger.transfer(t.currency, t.from, t.to, t.amount)?,
            }
        }
        Ok(())
    }
}
