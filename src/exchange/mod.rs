//! The hybrid exchange and its trade router.
//!
//! [`Exchange`] owns a [`ConstantProductPool`](crate::pools::ConstantProductPool)
//! and a [`PriceLadder`](crate::ladder::PriceLadder). Every trade is split
//! between the curve and the fixed-price rungs so that the trader always
//! gets the better of the two at each step.

mod core;
mod router;

#[cfg(test)]
mod proptest_properties;

pub use self::core::Exchange;
