//! In-memory [`TokenLedger`] for tests, demos, and simulations.

use std::collections::BTreeMap;

use crate::domain::{AccountId, Amount, Currency};
use crate::error::AmmError;
use crate::traits::TokenLedger;

/// A two-currency ledger held entirely in memory.
///
/// Balances and allowances default to zero. [`mint`](Self::mint) creates
/// supply out of thin air, so fixtures can fund accounts.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{AccountId, Amount, Currency};
/// use hydra_ladder::ledger::MemoryLedger;
/// use hydra_ladder::traits::TokenLedger;
///
/// let alice = AccountId::from_index(1);
/// let bob = AccountId::from_index(2);
/// let mut ledger = MemoryLedger::new();
/// ledger.mint(Currency::Base, alice, Amount::new(100)).expect("mint");
/// assert!(ledger.transfer(Currency::Base, alice, bob, Amount::new(40)).is_ok());
/// assert_eq!(ledger.balance_of(Currency::Base, &bob), Amount::new(40));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    balances: BTreeMap<(Currency, AccountId), Amount>,
    allowances: BTreeMap<(Currency, AccountId, AccountId), Amount>,
    supply: BTreeMap<Currency, Amount>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` to `account`, increasing total supply.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance or supply overflows.
    pub fn mint(
        &mut self,
        currency: Currency,
        account: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let supply = self
            .total_supply(currency)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("token supply overflow"))?;
        let balance = self
            .balance_of(currency, &account)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("balance overflow on mint"))?;
        self.supply.insert(currency, supply);
        self.balances.insert((currency, account), balance);
        Ok(())
    }

    /// Total minted supply of `currency`.
    pub fn total_supply(&self, currency: Currency) -> Amount {
        self.supply.get(&currency).copied().unwrap_or_default()
    }

    fn move_balance(
        &mut self,
        currency: Currency,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let from_balance = self
            .balance_of(currency, &from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance("transfer exceeds sender balance"))?;
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(currency, &to)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("recipient balance overflow"))?;
        self.balances.insert((currency, from), from_balance);
        self.balances.insert((currency, to), to_balance);
        Ok(())
    }
}

impl TokenLedger for MemoryLedger {
    fn balance_of(&self, currency: Currency, account: &AccountId) -> Amount {
        self.balances
            .get(&(currency, *account))
            .copied()
            .unwrap_or_default()
    }

    fn allowance(&self, currency: Currency, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(currency, *owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(
        &mut self,
        currency: Currency,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.allowances.insert((currency, owner, spender), amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        currency: Currency,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.move_balance(currency, from, to, amount)
    }

    fn transfer_from(
        &mut self,
        currency: Currency,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let allowed = self.allowance(currency, &owner, &spender);
        if amount > allowed {
            return Err(AmmError::InsufficientAllowance(
                "transfer exceeds spender allowance",
            ));
        }
        if self.balance_of(currency, &owner) < amount {
            return Err(AmmError::InsufficientBalance("transfer exceeds owner balance"));
        }
        if allowed != Amount::MAX {
            self.allowances
                .insert((currency, owner, spender), allowed.saturating_sub(&amount));
        }
        self.move_balance(currency, owner, to, amount)
    }
}
