//! # Hydra Ladder
//!
//! Hybrid exchange engine: a constant-product AMM whose price is bounded
//! by a ladder of fixed-price levels.
//!
//! The exchange trades one **base** currency against one **asset**
//! currency. Prices are quoted in asset per base as WAD (`1e18`)
//! fixed-point integers. Around the AMM spot price sit two ladders of
//! rungs spaced one `price_spread` step apart:
//!
//! - **Ceilings** above spot hold base and sell it at their rate to
//!   traders paying asset. Depositors earn asset.
//! - **Floors** below spot hold asset and buy base at their rate.
//!   Depositors earn base.
//!
//! Each trade walks the curve up (or down) to the active rung, fills the
//! rung, advances to the next one, and repeats. Within a rung depositors
//! are filled pro rata.
//!
//! # Quick Start
//!
//! ```rust
//! use hydra_ladder::config::ExchangeConfig;
//! use hydra_ladder::domain::{AccountId, Amount, CallContext, Currency, Price, Timestamp};
//! use hydra_ladder::exchange::Exchange;
//! use hydra_ladder::ledger::MemoryLedger;
//! use hydra_ladder::traits::TokenLedger;
//!
//! const WAD: u128 = Price::WAD;
//! let house = AccountId::from_index(1);
//! let (lp, maker, taker) = (
//!     AccountId::from_index(2),
//!     AccountId::from_index(3),
//!     AccountId::from_index(4),
//! );
//!
//! // 1. Fund everyone and let the exchange pull from them
//! let mut ledger = MemoryLedger::new();
//! for who in [lp, maker, taker] {
//!     for currency in [Currency::Base, Currency::Asset] {
//!         ledger.mint(currency, who, Amount::new(1_000 * WAD)).expect("mint");
//!         ledger.approve(currency, who, house, Amount::MAX).expect("approve");
//!     }
//! }
//!
//! // 2. Seed 100 asset / 10 base: spot 10, rungs at 10.25 and ~9.756
//! let mut exchange = Exchange::new(ExchangeConfig::with_defaults(house)).expect("valid");
//! let at = |who| CallContext::new(who, Timestamp::new(0));
//! exchange
//!     .initialize(&at(lp), Amount::new(100 * WAD), Amount::new(10 * WAD), &mut ledger)
//!     .expect("seeded");
//! let ceiling = exchange.current_ceiling_price().expect("seeded");
//! assert_eq!(ceiling, Price::new(10_250_000_000_000_000_000).expect("non-zero"));
//!
//! // 3. A maker deposits 5 base on the ceiling
//! let level = exchange.ceiling_mut(ceiling).expect("active rung");
//! ledger.approve(Currency::Base, maker, level.account(), Amount::MAX).expect("approve");
//! level
//!     .place_order(&at(maker), Amount::new(5 * WAD), None, &mut ledger)
//!     .expect("deposit");
//!
//! // 4. A taker buys base with 10 asset: curve up to 10.25, then the rung
//! let outcome = exchange
//!     .asset_to_base_input(&at(taker), Amount::new(10 * WAD), Amount::ZERO, Timestamp::MAX, taker, &mut ledger)
//!     .expect("trade");
//! assert_eq!(outcome.fills().len(), 1);
//! assert!(outcome.amount_out() > Amount::new(WAD / 10 * 9));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Exchange   │  atomic entry points, settlement, deadlines
//! └──────┬───────┘
//!        │ route(direction, spec)
//!        ▼
//! ┌──────────────┐      ┌──────────────┐
//! │    Router    │─────▶│ PriceLadder  │  active rungs, advance
//! └──────┬───────┘      └──────┬───────┘
//!        │ SwapPool            │ LevelFactory
//!        ▼                     ▼
//! ┌──────────────┐      ┌──────────────┐
//! │ ConstantProd │      │ FixedPrice   │  pro-rata books
//! └──────────────┘      └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Price`](domain::Price), [`TradeSpec`](domain::TradeSpec), etc. |
//! | [`traits`] | Seams: [`SwapPool`](traits::SwapPool), [`LiquidityPool`](traits::LiquidityPool), [`TokenLedger`](traits::TokenLedger), [`FromConfig`](traits::FromConfig) |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig) |
//! | [`pools`] | [`ConstantProductPool`](pools::ConstantProductPool) |
//! | [`levels`] | [`FixedPriceLevel`](levels::FixedPriceLevel) deposit books |
//! | [`factory`] | [`LevelFactory`](factory::LevelFactory) level construction and accounts |
//! | [`ladder`] | [`PriceLadder`](ladder::PriceLadder) rung bookkeeping |
//! | [`exchange`] | [`Exchange`](exchange::Exchange) entry points and routing |
//! | [`ledger`] | [`MemoryLedger`](ledger::MemoryLedger) and batched [`Settlement`](ledger::Settlement) |
//! | [`math`] | Checked and 256-bit wide arithmetic |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod factory;
pub mod ladder;
pub mod ledger;
pub mod levels;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
