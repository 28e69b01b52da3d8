//! Pricing curves backing the exchange.
//!
//! | Pool | Invariant |
//! |------|-----------|
//! | [`ConstantProductPool`] | `R_base · R_asset = k` |
//!
//! The exchange only talks to its curve through
//! [`SwapPool`](crate::traits::SwapPool) and
//! [`LiquidityPool`](crate::traits::LiquidityPool).

mod constant_product;

pub use constant_product::ConstantProductPool;
