//! Ladder sides and trade directions.
//!
//! A trade direction maps to exactly one ladder side:
//!
//! | Direction | Side | Level reserve | Trader pays | Depositor earns |
//! |-----------|------|---------------|-------------|-----------------|
//! | [`TradeDirection::AssetToBase`] | [`LevelSide::Ceiling`] | base | asset | asset |
//! | [`TradeDirection::BaseToAsset`] | [`LevelSide::Floor`] | asset | base | base |
//!
//! Selling asset pushes the spot price up into the ceilings; selling base
//! pushes it down into the floors.

use core::fmt;

use super::Currency;

/// Which side of the spot price a fixed-price level sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelSide {
    /// Below spot. Holds asset and buys base from traders.
    Floor,
    /// Above spot. Holds base and buys asset from traders.
    Ceiling,
}

impl LevelSide {
    /// The currency depositors place into a level of this side.
    #[must_use]
    pub const fn reserve_currency(&self) -> Currency {
        match self {
            Self::Floor => Currency::Asset,
            Self::Ceiling => Currency::Base,
        }
    }

    /// The currency traders pay in, and depositors are later paid out in.
    #[must_use]
    pub const fn entitlement_currency(&self) -> Currency {
        self.reserve_currency().other()
    }

    /// The trade direction that fills levels of this side.
    #[must_use]
    pub const fn direction(&self) -> TradeDirection {
        match self {
            Self::Floor => TradeDirection::BaseToAsset,
            Self::Ceiling => TradeDirection::AssetToBase,
        }
    }
}

impl fmt::Display for LevelSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floor => write!(f, "floor"),
            Self::Ceiling => write!(f, "ceiling"),
        }
    }
}

/// Direction of a trade through the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TradeDirection {
    /// Trader pays base, receives asset. Walks down the floors.
    BaseToAsset,
    /// Trader pays asset, receives base. Walks up the ceilings.
    AssetToBase,
}

impl TradeDirection {
    /// Currency the trader pays.
    #[must_use]
    pub const fn input_currency(&self) -> Currency {
        match self {
            Self::BaseToAsset => Currency::Base,
            Self::AssetToBase => Currency::Asset,
        }
    }

    /// Currency the trader receives.
    #[must_use]
    pub const fn output_currency(&self) -> Currency {
        self.input_currency().other()
    }

    /// The ladder side this direction consumes.
    #[must_use]
    pub const fn level_side(&self) -> LevelSide {
        match self {
            Self::BaseToAsset => LevelSide::Floor,
            Self::AssetToBase => LevelSide::Ceiling,
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseToAsset => write!(f, "base->asset"),
            Self::AssetToBase => write!(f, "asset->base"),
        }
    }
}
