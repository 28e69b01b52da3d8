//! Exchange configuration.
//!
//! [`ExchangeConfig`] is the declarative blueprint for an
//! [`Exchange`](crate::exchange::Exchange): custody account, rung spacing,
//! swap fee, and the per-trade rung cap.

mod exchange;

pub use exchange::ExchangeConfig;
