//! # Remittance Hub
//!
//! Hash-lock remittance escrow in a hub-and-spoke layout.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A hub deploys per-sender escrow instances (spokes). A spoke holds value
//! under a puzzle that binds a secret to one recipient and to the spoke
//! itself, credits that recipient (minus the hub fee) once they prove the
//! secret, and pays the credit out on a separate withdraw.
//!
//! ## Flow
//!
//! ```text
//! sender                    spoke                     recipient
//!   │  generate_puzzle(s, r)  │                           │
//!   │ ──────────────────────▶ │                           │
//!   │  create(puzzle) + value │                           │
//!   │ ──────────────────────▶ │  Locked                   │
//!   │                         │ ◀──────── release(s) ──── │
//!   │                         │  Released, credit - fee   │
//!   │                         │ ◀──────── withdraw() ──── │
//!   │                         │ ─────── transfer ───────▶ │
//! ```
//!
//! After expiry the recipient can no longer release and the sender may
//! `reclaim` the full amount into their own withdrawable balance.
//!
//! ## Module Structure
//!
//! ```text
//! remittance/
//! ├── domain/          # EscrowRecord, EscrowState, SecureSecret, errors
//! ├── algorithms/      # Puzzle hashing, instance addresses, fees
//! ├── ports/           # HubApi, RemittanceApi, ValueTransfer, Clock, HubRegistry
//! ├── adapters/        # InMemoryLedger, ManualClock, SystemClock, DetachedHub
//! └── service/         # RemittanceHub, RemittanceSpoke
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{DetachedHub, InMemoryLedger, ManualClock, SystemClock};
pub use algorithms::{
    derive_instance_address, generate_puzzle, generate_random_secret, minimum_deposit,
    puzzle_hash, split_fee,
};
pub use config::RemittanceConfig;
pub use domain::{
    EscrowRecord, EscrowState, ErrorKind, RemittanceError, SecureSecret, TransferError,
};
pub use ports::{Clock, HubApi, HubRegistry, RemittanceApi, ValueTransfer};
pub use service::{RemittanceEnv, RemittanceHub, RemittanceSpoke};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
