//! Fundamental domain value types used throughout the exchange.
//!
//! This module contains the value types that model the hybrid exchange:
//! amounts, shares, fixed-point prices, accounts, currencies, ladder
//! sides, and trade specifications. All types use newtypes with
//! validated constructors to enforce invariants.

mod account_id;
mod amount;
mod basis_points;
mod currency;
mod fee_tier;
mod price;
mod rounding;
mod shares;
mod side;
mod swap_leg;
mod timestamp;
mod trade_outcome;
mod trade_spec;

pub use account_id::AccountId;
pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use currency::Currency;
pub use fee_tier::FeeTier;
pub use price::Price;
pub use rounding::Rounding;
pub use shares::Shares;
pub use side::{LevelSide, TradeDirection};
pub use swap_leg::SwapLeg;
pub use timestamp::{CallContext, Timestamp};
pub use trade_outcome::{RungFill, TradeOutcome};
pub use trade_spec::TradeSpec;
