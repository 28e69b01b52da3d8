//! Checked arithmetic trait for domain wrapper types.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of `Option`, so pool, level, and router code can propagate failures
//! with `?` and a precise error variant.
//!
//! # Implementations
//!
//! - [`Amount`]: token quantities (`u128`)
//! - [`Shares`]: LP share quantities (`u128`)
//!
//! # Examples
//!
//! ```
//! use hydra_ladder::domain::Amount;
//! use hydra_ladder::math::CheckedArithmetic;
//!
//! let a = Amount::new(100);
//! assert_eq!(a.safe_add(&Amount::new(200)), Ok(Amount::new(300)));
//! assert!(a.safe_sub(&Amount::new(200)).is_err());
//! ```

use crate::domain::{Amount, Rounding, Shares};
use crate::error::AmmError;

/// Fallible arithmetic for domain wrapper types.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Computes `self × numerator / denominator` through a 256-bit
    /// intermediate.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DivisionByZero`] if `denominator` is zero.
    /// - [`AmmError::Overflow`] if the quotient exceeds `u128`.
    fn safe_mul_div(
        &self,
        numerator: u128,
        denominator: u128,
        rounding: Rounding,
    ) -> Result<Self, AmmError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    fn safe_mul_div(
        &self,
        numerator: u128,
        denominator: u128,
        rounding: Rounding,
    ) -> Result<Self, AmmError> {
        super::mul_div(self.get(), numerator, denominator, rounding).map(Amount::new)
    }
}

impl CheckedArithmetic for Shares {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("shares addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("shares subtraction underflow"))
    }

    fn safe_mul_div(
        &self,
        numerator: u128,
        denominator: u128,
        rounding: Rounding,
    ) -> Result<Self, AmmError> {
        super::mul_div(self.get(), numerator, denominator, rounding).map(Shares::new)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    mod amount {
        use super::*;

        #[test]
        fn add_ok() {
            let Ok(r) = Amount::new(100).safe_add(&Amount::new(200)) else {
                panic!("expected Ok");
            };
            assert_eq!(r, Amount::new(300));
        }

        #[test]
        fn add_overflow() {
            let Err(AmmError::Overflow(_)) = Amount::MAX.safe_add(&Amount::new(1)) else {
                panic!("expected Overflow");
            };
        }

        #[test]
        fn sub_underflow() {
            let Err(AmmError::Underflow(_)) = Amount::new(1).safe_sub(&Amount::new(2)) else {
                panic!("expected Underflow");
            };
        }

        #[test]
        fn mul_div_proportional() {
            // 200 * 10 / 20 = 100
            let Ok(r) = Amount::new(200).safe_mul_div(10, 20, Rounding::Down) else {
                panic!("expected Ok");
            };
            assert_eq!(r, Amount::new(100));
        }

        #[test]
        fn mul_div_zero_denominator() {
            let result = Amount::new(1).safe_mul_div(1, 0, Rounding::Down);
            assert_eq!(result, Err(AmmError::DivisionByZero));
        }
    }

    mod shares {
        use super::*;

        #[test]
        fn add_and_sub() {
            let Ok(sum) = Shares::new(10).safe_add(&Shares::new(10)) else {
                panic!("expected Ok");
            };
            assert_eq!(sum, Shares::new(20));
            let Ok(diff) = sum.safe_sub(&Shares::new(5)) else {
                panic!("expected Ok");
            };
            assert_eq!(diff, Shares::new(15));
        }

        #[test]
        fn sub_underflow() {
            let Err(AmmError::Underflow(_)) = Shares::ZERO.safe_sub(&Shares::new(1)) else {
                panic!("expected Underflow");
            };
        }

        #[test]
        fn mul_div_rounds_down() {
            let Ok(r) = Shares::new(10).safe_mul_div(1, 3, Rounding::Down) else {
                panic!("expected Ok");
            };
            assert_eq!(r, Shares::new(3));
        }
    }
}
