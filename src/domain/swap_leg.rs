//! One leg of a trade priced on the constant-product curve.

use core::fmt;

use super::Amount;
use crate::error::AmmError;

/// Input, output, and fee of a single AMM leg.
///
/// Unlike a fixed-price rung, a curve leg may legitimately produce zero
/// output: a dust remainder is still absorbed into the reserves.
///
/// # Invariants
///
/// `fee ≤ amount_in`.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{Amount, SwapLeg};
///
/// let leg = SwapLeg::new(Amount::new(1_000), Amount::new(990), Amount::new(3));
/// assert!(leg.is_ok());
/// assert!(SwapLeg::new(Amount::new(1), Amount::ZERO, Amount::new(2)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwapLeg {
    amount_in: Amount,
    amount_out: Amount,
    fee: Amount,
}

impl SwapLeg {
    /// A leg that moves nothing.
    pub const EMPTY: Self = Self {
        amount_in: Amount::ZERO,
        amount_out: Amount::ZERO,
        fee: Amount::ZERO,
    };

    /// Creates a leg after checking the fee bound.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if `fee > amount_in`.
    pub const fn new(
        amount_in: Amount,
        amount_out: Amount,
        fee: Amount,
    ) -> crate::error::Result<Self> {
        if fee.get() > amount_in.get() {
            return Err(AmmError::InvalidQuantity("fee must not exceed amount_in"));
        }
        Ok(Self {
            amount_in,
            amount_out,
            fee,
        })
    }

    /// Gross input, fee included.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Output paid from the opposite reserve.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Fee retained in the input reserve.
    pub const fn fee(&self) -> Amount {
        self.fee
    }

    /// Returns `true` if the leg moved no input.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount_in.is_zero()
    }
}

impl fmt::Display for SwapLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapLeg(in={}, out={}, fee={})",
            self.amount_in, self.amount_out, self.fee
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn dust_leg_with_zero_output_is_valid() {
        let Ok(leg) = SwapLeg::new(Amount::new(1), Amount::ZERO, Amount::ZERO) else {
            panic!("expected Ok");
        };
        assert!(!leg.is_empty());
        assert!(leg.amount_out().is_zero());
    }

    #[test]
    fn fee_above_input_rejected() {
        let result = SwapLeg::new(Amount::new(5), Amount::new(1), Amount::new(6));
        assert!(matches!(result, Err(AmmError::InvalidQuantity(_))));
    }

    #[test]
    fn empty_and_display() {
        assert!(SwapLeg::EMPTY.is_empty());
        assert_eq!(SwapLeg::default(), SwapLeg::EMPTY);
        assert_eq!(SwapLeg::EMPTY.to_string(), "SwapLeg(in=0, out=0, fee=0)");
    }
}
