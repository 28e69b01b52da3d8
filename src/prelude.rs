//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_ladder::prelude::*;
//! ```

pub use crate::domain::{
    AccountId, Amount, BasisPoints, CallContext, Currency, FeeTier, LevelSide, Price, Rounding,
    Shares, Timestamp, TradeDirection, TradeOutcome, TradeSpec,
};

pub use crate::traits::{FromConfig, LiquidityPool, SwapPool, TokenLedger};

pub use crate::math::CheckedArithmetic;

pub use crate::config::ExchangeConfig;

pub use crate::error::{AmmError, Result};

pub use crate::exchange::Exchange;
pub use crate::ladder::PriceLadder;
pub use crate::ledger::MemoryLedger;
pub use crate::levels::FixedPriceLevel;
