//! # Remittance Hub Test Suite
//!
//! Unified test crate for cross-crate behaviour.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # Hub → spoke → ledger → bus, end to end
//!     └── concurrency.rs  # Racing releases, withdrawals and deployments
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rh-tests
//! cargo test -p rh-tests integration::concurrency
//! ```

#![allow(dead_code)]
