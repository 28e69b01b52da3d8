//! Level instantiation via the factory pattern.
//!
//! The [`LevelFactory`] creates empty fixed-price levels for the ladder.
//! Every level of a side shares one immutable
//! [`LevelTemplate`](crate::levels::LevelTemplate); only the rate, the
//! derived ledger account, and the per-level bookkeeping differ.

mod level_factory;

pub use level_factory::LevelFactory;
