//! # Shared Types Crate
//!
//! Primitive identifiers used across the hub, the spokes and the event bus.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `Hash` and `Amount` are defined
//!   once here and re-used by every crate in the workspace.
//! - **Caller Identity in Context**: every mutating call carries a
//!   `CallContext`; payloads never repeat the caller.

pub mod entities;

pub use entities::*;
