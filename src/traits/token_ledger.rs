//! Fungible-token ledger capability.
//!
//! The exchange and its levels never own token balances directly. They
//! are handed a [`TokenLedger`] for the duration of each call and move
//! funds through it, after their own state has been updated.
//!
//! The ledger is assumed atomic and truthful: a transfer that returns
//! `Ok` has happened, one that returns `Err` has not.

use crate::domain::{AccountId, Amount, Currency};
use crate::error::AmmError;

/// A two-currency fungible-token ledger with ERC-20 style allowances.
///
/// An allowance of [`Amount::MAX`] is treated as unlimited and is not
/// decremented by [`transfer_from`](Self::transfer_from).
pub trait TokenLedger {
    /// Balance of `account` in `currency`.
    #[must_use]
    fn balance_of(&self, currency: Currency, account: &AccountId) -> Amount;

    /// How much `spender` may still pull from `owner`.
    #[must_use]
    fn allowance(&self, currency: Currency, owner: &AccountId, spender: &AccountId) -> Amount;

    /// Sets the allowance `owner` grants `spender`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Implementations may refuse approvals; the in-memory ledger never does.
    fn approve(
        &mut self,
        currency: Currency,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Moves `amount` from `from` to `to` on `from`'s authority.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if `from` holds too little.
    /// - [`AmmError::Overflow`] if the recipient balance would overflow.
    fn transfer(
        &mut self,
        currency: Currency,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Moves `amount` from `owner` to `to` on `spender`'s authority,
    /// consuming allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `owner` holds too little.
    fn transfer_from(
        &mut self,
        currency: Currency,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), AmmError>;
}
