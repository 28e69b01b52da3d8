//! Host time and caller identity.

use core::fmt;

use super::AccountId;
use crate::error::AmmError;

/// Host-supplied time, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(u64);

impl Timestamp {
    /// The latest representable time; never expires.
    pub const MAX: Self = Self(u64::MAX);

    /// Creates a timestamp from seconds.
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Returns the raw seconds.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// Who is calling and when.
///
/// Stands in for the host's implicit caller and block time. Every
/// mutating entry point takes one.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{AccountId, CallContext, Timestamp};
///
/// let ctx = CallContext::new(AccountId::from_index(1), Timestamp::new(100));
/// assert!(ctx.check_deadline(Timestamp::new(100)).is_ok());
/// assert!(ctx.check_deadline(Timestamp::new(99)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// The calling account.
    pub sender: AccountId,
    /// Current host time.
    pub now: Timestamp,
}

impl CallContext {
    /// Creates a new call context.
    #[must_use]
    pub const fn new(sender: AccountId, now: Timestamp) -> Self {
        Self { sender, now }
    }

    /// A deadline equal to `now` is still accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DeadlineExceeded`] if `now > deadline`.
    pub const fn check_deadline(&self, deadline: Timestamp) -> crate::error::Result<()> {
        if self.now.0 > deadline.0 {
            return Err(AmmError::DeadlineExceeded {
                now: self.now.0,
                deadline: deadline.0,
            });
        }
        Ok(())
    }
}
