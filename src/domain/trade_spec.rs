//! Trade constraint: exact input or exact output, with a slippage bound.

use core::fmt;

use super::Amount;
use crate::error::AmmError;

/// What drives a trade and the worst result the caller accepts.
///
/// The slippage bound is checked once, against the combined ladder and
/// AMM result.
///
/// # Invariants
///
/// The driving amount is always non-zero.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{Amount, TradeSpec};
///
/// let spec = TradeSpec::exact_in(Amount::new(1_000), Amount::new(900));
/// assert!(spec.is_ok());
/// assert!(TradeSpec::exact_out(Amount::ZERO, Amount::MAX).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TradeSpec {
    /// The caller sells exactly `amount_in` and wants at least `min_out`.
    ExactIn {
        /// Fixed input (non-zero).
        amount_in: Amount,
        /// Minimum acceptable output.
        min_out: Amount,
    },
    /// The caller buys exactly `amount_out` and pays at most `max_in`.
    ExactOut {
        /// Fixed output (non-zero).
        amount_out: Amount,
        /// Maximum acceptable input.
        max_in: Amount,
    },
}

impl TradeSpec {
    /// Creates an exact-input specification.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if `amount_in` is zero.
    pub const fn exact_in(amount_in: Amount, min_out: Amount) -> crate::error::Result<Self> {
        if amount_in.is_zero() {
            return Err(AmmError::InvalidQuantity("trade amount must be non-zero"));
        }
        Ok(Self::ExactIn { amount_in, min_out })
    }

    /// Creates an exact-output specification.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if `amount_out` is zero.
    pub const fn exact_out(amount_out: Amount, max_in: Amount) -> crate::error::Result<Self> {
        if amount_out.is_zero() {
            return Err(AmmError::InvalidQuantity("trade amount must be non-zero"));
        }
        Ok(Self::ExactOut { amount_out, max_in })
    }

    /// Returns `true` if this is an exact-input specification.
    #[must_use]
    pub const fn is_exact_in(&self) -> bool {
        matches!(self, Self::ExactIn { .. })
    }

    /// The driving amount regardless of variant.
    pub const fn amount(&self) -> Amount {
        match self {
            Self::ExactIn { amount_in, .. } => *amount_in,
            Self::ExactOut { amount_out, .. } => *amount_out,
        }
    }

    /// Same constraint with the slippage bound removed. Used by quotes.
    pub const fn unbounded(&self) -> Self {
        match self {
            Self::ExactIn { amount_in, .. } => Self::ExactIn {
                amount_in: *amount_in,
                min_out: Amount::ZERO,
            },
            Self::ExactOut { amount_out, .. } => Self::ExactOut {
                amount_out: *amount_out,
                max_in: Amount::MAX,
            },
        }
    }

    /// Checks a combined result against the slippage bound.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::SlippageExceeded`] if the bound is violated.
    pub const fn check_slippage(
        &self,
        amount_in: Amount,
        amount_out: Amount,
    ) -> crate::error::Result<()> {
        match self {
            Self::ExactIn { min_out, .. } if amount_out.get() < min_out.get() => {
                Err(AmmError::SlippageExceeded("output below min_out"))
            }
            Self::ExactOut { max_in, .. } if amount_in.get() > max_in.get() => {
                Err(AmmError::SlippageExceeded("input above max_in"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for TradeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn { amount_in, min_out } => {
                write!(f, "ExactIn({amount_in}, min_out={min_out})")
            }
            Self::ExactOut { amount_out, max_in } => {
                write!(f, "ExactOut({amount_out}, max_in={max_in})")
            }
        }
    }
}
