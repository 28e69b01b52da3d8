//! Generic construction trait for configuration-driven instantiation.
//!
//! [`FromConfig`] gives the AMM pool and the exchange a uniform way to be
//! built from an [`ExchangeConfig`](crate::config::ExchangeConfig).
//!
//! # Validation Contract
//!
//! Implementations **must** validate all configuration invariants during
//! construction. A successfully constructed value is in a valid initial
//! state:
//!
//! - Price spread is within `1..=10_000` basis points
//! - Fee tier is strictly below 100%
//! - The per-trade rung limit is non-zero

use crate::error::AmmError;

/// Construction from a validated configuration.
///
/// # Implementors
///
/// - `impl FromConfig<ExchangeConfig> for ConstantProductPool`
/// - `impl FromConfig<ExchangeConfig> for Exchange`
///
/// # Errors
///
/// Returns [`AmmError::InvalidConfiguration`] (or a more specific
/// variant such as [`AmmError::InvalidFee`]) if the configuration is
/// invalid.
pub trait FromConfig<C> {
    /// Creates a new instance from the given configuration.
    ///
    /// The configuration is taken by reference because the same config
    /// may build several components.
    ///
    /// # Errors
    ///
    /// Propagates the configuration's validation error.
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
