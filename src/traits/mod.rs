//! Core trait abstractions at the exchange's seams.
//!
//! - [`SwapPool`]: the continuous pricing curve the router falls back to.
//! - [`LiquidityPool`]: share accounting over that curve's reserves.
//! - [`TokenLedger`]: the external fungible-token ledger, passed in as a
//!   capability.
//! - [`FromConfig`]: configuration-driven construction.

mod from_config;
mod liquidity_pool;
mod swap_pool;
mod token_ledger;

pub use from_config::FromConfig;
pub use liquidity_pool::{LiquidityPool, LiquidityReceipt};
pub use swap_pool::SwapPool;
pub use token_ledger::TokenLedger;
