//! Explicit rounding direction for arithmetic operations.

/// Specifies the rounding direction for division and multiplication
/// operations on domain types.
///
/// Every division in the exchange requires an explicit `Rounding` so
/// that each quantity rounds in the direction that favors the exchange
/// and its depositors over the trader.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert!(Rounding::Down.is_down());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
