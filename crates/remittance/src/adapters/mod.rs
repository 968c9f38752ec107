//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound ports for local runs and tests.

mod clock;
mod detached_hub;
mod ledger;

pub use clock::{ManualClock, SystemClock};
pub use detached_hub::DetachedHub;
pub use ledger::InMemoryLedger;
