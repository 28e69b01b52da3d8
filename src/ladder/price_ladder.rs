//! Active rungs and the sparse price → level maps.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{BasisPoints, LevelSide, Price};
use crate::error::AmmError;
use crate::factory::LevelFactory;
use crate::levels::FixedPriceLevel;

/// The two-sided ladder of fixed-price levels around the AMM spot.
///
/// Each side tracks an *active* price, the rung the router fills next,
/// and a map of every level ever created on that side. Stored prices
/// form a single chain: ceilings step up from the seed ceiling, floors
/// step down from the seed floor.
///
/// # Stepping
///
/// ```text
/// step_up(p)   = ceil(p × (10 000 + spread) / 10 000)
/// step_down(p) = floor(p × 10 000 / (10 000 + spread))
/// ```
///
/// # Example
///
/// ```rust
/// use hydra_ladder::domain::{AccountId, BasisPoints, LevelSide, Price};
/// use hydra_ladder::factory::LevelFactory;
/// use hydra_ladder::ladder::PriceLadder;
///
/// let spot = Price::new(10 * Price::WAD).expect("non-zero");
/// let mut ladder = PriceLadder::new(
///     LevelFactory::new(AccountId::from_index(1)),
///     BasisPoints::new(250),
///     spot,
/// )
/// .expect("seeded");
///
/// assert_eq!(ladder.current_ceiling_price().to_string(), "10.25");
/// let next = ladder.next_price(LevelSide::Ceiling).expect("step");
/// assert!(ladder.add_ceiling_level(next).is_ok());
/// assert!(ladder.add_ceiling_level(next).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLadder {
    factory: LevelFactory,
    spread: BasisPoints,
    current_ceiling: Price,
    current_floor: Price,
    ceilings: BTreeMap<Price, FixedPriceLevel>,
    floors: BTreeMap<Price, FixedPriceLevel>,
}

impl PriceLadder {
    /// Seeds one empty rung on each side of `spot`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPrice`] if the floor would step to zero.
    /// - [`AmmError::Overflow`] if the ceiling overflows.
    pub fn new(factory: LevelFactory, spread: BasisPoints, spot: Price) -> Result<Self, AmmError> {
        let current_ceiling = spot.step_up(spread)?;
        let current_floor = spot.step_down(spread)?;
        let mut ceilings = BTreeMap::new();
        ceilings.insert(
            current_ceiling,
            factory.create(LevelSide::Ceiling, current_ceiling),
        );
        let mut floors = BTreeMap::new();
        floors.insert(current_floor, factory.create(LevelSide::Floor, current_floor));
        Ok(Self {
            factory,
            spread,
            current_ceiling,
            current_floor,
            ceilings,
            floors,
        })
    }

    /// Distance between adjacent rungs.
    #[must_use]
    pub const fn spread(&self) -> BasisPoints {
        self.spread
    }

    /// The factory levels are created through.
    #[must_use]
    pub const fn factory(&self) -> &LevelFactory {
        &self.factory
    }

    /// Active ceiling price.
    #[must_use]
    pub const fn current_ceiling_price(&self) -> Price {
        self.current_ceiling
    }

    /// Active floor price.
    #[must_use]
    pub const fn current_floor_price(&self) -> Price {
        self.current_floor
    }

    /// Active price on `side`.
    #[must_use]
    pub const fn current_price(&self, side: LevelSide) -> Price {
        match side {
            LevelSide::Floor => self.current_floor,
            LevelSide::Ceiling => self.current_ceiling,
        }
    }

    /// The step beyond the active price, away from spot.
    ///
    /// # Errors
    ///
    /// Propagates [`Price::step_up`] / [`Price::step_down`] failures.
    pub fn next_price(&self, side: LevelSide) -> Result<Price, AmmError> {
        match side {
            LevelSide::Floor => self.current_floor.step_down(self.spread),
            LevelSide::Ceiling => self.current_ceiling.step_up(self.spread),
        }
    }

    const fn side_map(&self, side: LevelSide) -> &BTreeMap<Price, FixedPriceLevel> {
        match side {
            LevelSide::Floor => &self.floors,
            LevelSide::Ceiling => &self.ceilings,
        }
    }

    fn side_map_mut(&mut self, side: LevelSide) -> &mut BTreeMap<Price, FixedPriceLevel> {
        match side {
            LevelSide::Floor => &mut self.floors,
            LevelSide::Ceiling => &mut self.ceilings,
        }
    }

    /// Level at `price` on `side`, if one was created.
    #[must_use]
    pub fn level(&self, side: LevelSide, price: Price) -> Option<&FixedPriceLevel> {
        self.side_map(side).get(&price)
    }

    /// Mutable level at `price` on `side`.
    pub fn level_mut(&mut self, side: LevelSide, price: Price) -> Option<&mut FixedPriceLevel> {
        self.side_map_mut(side).get_mut(&price)
    }

    /// Ceiling level at `price`.
    #[must_use]
    pub fn ceiling(&self, price: Price) -> Option<&FixedPriceLevel> {
        self.ceilings.get(&price)
    }

    /// Floor level at `price`.
    #[must_use]
    pub fn floor(&self, price: Price) -> Option<&FixedPriceLevel> {
        self.floors.get(&price)
    }

    /// All levels on `side`, in ascending price order.
    pub fn levels(&self, side: LevelSide) -> impl Iterator<Item = &FixedPriceLevel> {
        self.side_map(side).values()
    }

    /// The active level on `side`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::LevelNotFound`] if the active rung has no level,
    /// which the ladder never allows.
    pub fn current_level(&self, side: LevelSide) -> Result<&FixedPriceLevel, AmmError> {
        let price = self.current_price(side);
        self.level(side, price)
            .ok_or(AmmError::LevelNotFound(price.get()))
    }

    pub(crate) fn current_level_mut(
        &mut self,
        side: LevelSide,
    ) -> Result<&mut FixedPriceLevel, AmmError> {
        let price = self.current_price(side);
        self.level_mut(side, price)
            .ok_or(AmmError::LevelNotFound(price.get()))
    }

    /// Creates the level one step beyond the active rung on `side`.
    ///
    /// The active price does not move.
    ///
    /// # Errors
    ///
    /// - [`AmmError::LevelExists`] if a level already sits at `price`.
    /// - [`AmmError::NonContiguousLevel`] if `price` is not the next step.
    pub fn add_level(
        &mut self,
        side: LevelSide,
        price: Price,
    ) -> Result<&mut FixedPriceLevel, AmmError> {
        if self.level(side, price).is_some() {
            return Err(AmmError::LevelExists(price.get()));
        }
        if price != self.next_price(side)? {
            return Err(AmmError::NonContiguousLevel(
                "level price must be one step beyond the active rung",
            ));
        }
        let level = self.factory.create(side, price);
        Ok(self.side_map_mut(side).entry(price).or_insert(level))
    }

    /// [`add_level`](Self::add_level) on the ceiling side.
    ///
    /// # Errors
    ///
    /// Same as [`add_level`](Self::add_level).
    pub fn add_ceiling_level(&mut self, price: Price) -> Result<&mut FixedPriceLevel, AmmError> {
        self.add_level(LevelSide::Ceiling, price)
    }

    /// [`add_level`](Self::add_level) on the floor side.
    ///
    /// # Errors
    ///
    /// Same as [`add_level`](Self::add_level).
    pub fn add_floor_level(&mut self, price: Price) -> Result<&mut FixedPriceLevel, AmmError> {
        self.add_level(LevelSide::Floor, price)
    }

    /// Moves the active rung on `side` one step away from spot, creating
    /// an empty level there if none exists. Returns the new price.
    pub(crate) fn advance(&mut self, side: LevelSide) -> Result<Price, AmmError> {
        let next = self.next_price(side)?;
        if self.level(side, next).is_none() {
            let level = self.factory.create(side, next);
            self.side_map_mut(side).insert(next, level);
        }
        match side {
            LevelSide::Floor => self.current_floor = next,
            LevelSide::Ceiling => self.current_ceiling = next,
        }
        debug!(%side, price = %next, "rung advanced");
        Ok(next)
    }

    /// Advances the active rung on `side` until it lies strictly beyond
    /// `spot`: a ceiling above it, a floor below it. Stops early if the
    /// side cannot step further. Returns the number of steps taken.
    pub(crate) fn advance_past(&mut self, side: LevelSide, spot: Price) -> u32 {
        let mut steps = 0;
        while !self.is_beyond(side, spot) {
            if let Err(err) = self.advance(side) {
                debug!(%side, %err, "ladder cannot step further");
                break;
            }
            steps += 1;
        }
        steps
    }

    /// Whether the active rung on `side` lies strictly beyond `spot`.
    #[must_use]
    pub fn is_beyond(&self, side: LevelSide, spot: Price) -> bool {
        match side {
            LevelSide::Floor => self.current_floor < spot,
            LevelSide::Ceiling => self.current_ceiling > spot,
        }
    }

    /// Returns `true` if every stored price on both sides is exactly one
    /// step from its neighbour.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        let chain_up = self
            .ceilings
            .keys()
            .zip(self.ceilings.keys().skip(1))
            .all(|(low, high)| low.step_up(self.spread).is_ok_and(|p| p == *high));
        let chain_down = self
            .floors
            .keys()
            .rev()
            .zip(self.floors.keys().rev().skip(1))
            .all(|(high, low)| high.step_down(self.spread).is_ok_and(|p| p == *low));
        chain_up && chain_down
    }
}
