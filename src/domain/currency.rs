//! The two currencies of the traded pair.

use core::fmt;

/// One side of the base/asset pair.
///
/// The exchange trades a single pair. Prices are always asset per base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Currency {
    /// The pricing currency of the pair.
    Base,
    /// The token priced in base.
    Asset,
}

impl Currency {
    /// The other currency of the pair.
    #[must_use]
    pub const fn other(&self) -> Self {
        match self {
            Self::Base => Self::Asset,
            Self::Asset => Self::Base,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Asset => write!(f, "asset"),
        }
    }
}
