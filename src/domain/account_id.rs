//! Chain-agnostic account identifier.

use core::fmt;

/// An account on the host ledger: a trader, a depositor, the exchange's
/// custody account, or a fixed-price level.
///
/// Wraps a fixed-size `[u8; 32]` byte array. All 32-byte sequences are
/// valid, so construction is infallible. Ordering is lexicographic on
/// the bytes; level fills allocate to depositors in that order.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::AccountId;
///
/// let alice = AccountId::from_bytes([1u8; 32]);
/// assert_eq!(alice.as_bytes(), [1u8; 32]);
/// assert!(AccountId::from_index(1) < AccountId::from_index(2));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Creates an `AccountId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Builds an id whose trailing eight bytes hold `index` big-endian.
    ///
    /// Handy for fixtures; ids built this way order by `index`.
    #[must_use]
    pub const fn from_index(index: u64) -> Self {
        let mut bytes = [0u8; 32];
        let be = index.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the all-zero account.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({self})")
    }
}

impl fmt::Display for AccountId {
    /// Short hex form: first four and last four bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..")?;
        for b in &self.0[28..] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
