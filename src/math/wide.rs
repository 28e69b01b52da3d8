//! 256-bit intermediates for overflow-safe fixed-point arithmetic.
//!
//! Reserves and prices are both 18-decimal `u128` values, so a single
//! product such as `reserve × price` can exceed `u128::MAX` long before
//! the final quotient does.  Every such computation widens to [`U256`],
//! divides, and narrows back with a checked conversion.

use uint::construct_uint;

use crate::domain::Rounding;
use crate::error::AmmError;

construct_uint! {
    /// Unsigned 256-bit integer used only for intermediate products.
    pub struct U256(4);
}

construct_uint! {
    /// Room for a full `U256 × u128` product.
    struct U512(8);
}

fn widen(value: U256) -> U512 {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    U512::from_big_endian(&bytes)
}

/// Narrows a [`U256`] back to `u128`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] with `context` if the value does not fit.
pub fn narrow(value: U256, context: &'static str) -> Result<u128, AmmError> {
    if value > U256::from(u128::MAX) {
        return Err(AmmError::Overflow(context));
    }
    Ok(value.low_u128())
}

/// Divides a widened numerator with explicit [`Rounding`].
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `denominator` is zero.
pub fn div_wide(numerator: U256, denominator: U256, rounding: Rounding) -> Result<U256, AmmError> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => Ok(quotient),
        Rounding::Up => {
            if (numerator % denominator).is_zero() {
                Ok(quotient)
            } else {
                // quotient ≤ numerator < U256::MAX whenever a remainder exists
                Ok(quotient + U256::one())
            }
        }
    }
}

/// Computes `a × b / denominator` without intermediate overflow.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the final quotient exceeds `u128::MAX`.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::Rounding;
/// use hydra_ladder::math::mul_div;
///
/// // (u128::MAX × 2) / 4 fits even though the product does not.
/// let Ok(v) = mul_div(u128::MAX, 2, 4, Rounding::Down) else { panic!() };
/// assert_eq!(v, u128::MAX / 2);
/// assert_eq!(mul_div(10, 1, 3, Rounding::Up), Ok(4));
/// ```
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128, AmmError> {
    // u128 × u128 always fits in 256 bits
    let product = U256::from(a) * U256::from(b);
    let quotient = div_wide(product, U256::from(denominator), rounding)?;
    narrow(quotient, "mul_div result exceeds u128")
}

/// Floor of the square root of `a × b / denominator`.
///
/// Used to locate the reserve level at which the constant-product curve's
/// marginal price equals a given rung rate. The product is taken in 512
/// bits, so any reserve product the pool can hold is accepted.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the root exceeds `u128::MAX`.
pub fn sqrt_mul_div(a: U256, b: u128, denominator: u128) -> Result<u128, AmmError> {
    if denominator == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = widen(a) * U512::from(b);
    let root = (product / U512::from(denominator)).integer_sqrt();
    if root > U512::from(u128::MAX) {
        return Err(AmmError::Overflow("sqrt_mul_div root exceeds u128"));
    }
    Ok(root.low_u128())
}
