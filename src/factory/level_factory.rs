//! Deterministic construction of ladder levels.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{AccountId, LevelSide, Price};
use crate::levels::{FixedPriceLevel, LevelTemplate};

/// Builds empty [`FixedPriceLevel`]s bound to a price.
///
/// Each side has one immutable [`LevelTemplate`], shared by every level the
/// factory creates through an `Arc`. Level accounts are derived from the
/// exchange account, the side, and the price, so the same inputs always
/// yield the same account.
///
/// # Account Derivation
///
/// ```text
/// bytes[0..16]  = exchange bytes[0..16] XOR exchange bytes[16..32]
/// bytes[0]     ^= 0x81 (floor) | 0x82 (ceiling)
/// bytes[16..32] = price, big-endian
/// ```
///
/// Every byte of the exchange account feeds the fold, so exchanges that
/// differ anywhere get different level accounts at the same price.
///
/// # Example
///
/// ```rust
/// use hydra_ladder::domain::{AccountId, LevelSide, Price};
/// use hydra_ladder::factory::LevelFactory;
///
/// let factory = LevelFactory::new(AccountId::from_index(7));
/// let price = Price::new(10 * Price::WAD).expect("non-zero");
///
/// let level = factory.create(LevelSide::Ceiling, price);
/// assert!(level.reserve().is_zero());
/// assert_eq!(level.account(), factory.level_account(LevelSide::Ceiling, price));
/// assert_ne!(level.account(), factory.level_account(LevelSide::Floor, price));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFactory {
    exchange: AccountId,
    floor_template: Arc<LevelTemplate>,
    ceiling_template: Arc<LevelTemplate>,
}

impl LevelFactory {
    /// Creates a factory for levels owned by `exchange`.
    #[must_use]
    pub fn new(exchange: AccountId) -> Self {
        Self {
            exchange,
            floor_template: Arc::new(LevelTemplate::new(LevelSide::Floor, exchange)),
            ceiling_template: Arc::new(LevelTemplate::new(LevelSide::Ceiling, exchange)),
        }
    }

    /// The owning exchange's account.
    #[must_use]
    pub const fn exchange(&self) -> AccountId {
        self.exchange
    }

    /// The shared template for `side`.
    #[must_use]
    pub fn template(&self, side: LevelSide) -> &Arc<LevelTemplate> {
        match side {
            LevelSide::Floor => &self.floor_template,
            LevelSide::Ceiling => &self.ceiling_template,
        }
    }

    /// Ledger account of the level at (`side`, `price`).
    #[must_use]
    pub fn level_account(&self, side: LevelSide, price: Price) -> AccountId {
        let exchange = self.exchange.as_bytes();
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().take(16).enumerate() {
            *byte = exchange[i] ^ exchange[i + 16];
        }
        bytes[0] ^= match side {
            LevelSide::Floor => 0x81,
            LevelSide::Ceiling => 0x82,
        };
        bytes[16..].copy_from_slice(&price.get().to_be_bytes());
        AccountId::from_bytes(bytes)
    }

    /// Creates an empty level at `price`.
    #[must_use]
    pub fn create(&self, side: LevelSide, price: Price) -> FixedPriceLevel {
        let account = self.level_account(side, price);
        debug!(%side, %price, %account, "level created");
        FixedPriceLevel::new(Arc::clone(self.template(side)), account, price)
    }
}
