//! Token-ledger plumbing: batched settlement and an in-memory ledger.
//!
//! The [`TokenLedger`](crate::traits::TokenLedger) trait is the external
//! collaborator. [`Settlement`] is how every operation talks to it, and
//! [`MemoryLedger`] is a self-contained implementation for tests and
//! simulations.

mod memory;
mod settlement;

pub use memory::MemoryLedger;
pub use settlement::{Settlement, Transfer};
