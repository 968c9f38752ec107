//! # Core Entities
//!
//! Account identifiers, hashes, value units and the call context that
//! accompanies every state-changing request.

use serde::{Deserialize, Serialize};

/// A 32-byte hash (Keccak-256 output, puzzle keys).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style account address.
pub type Address = [u8; 20];

/// Value in base units.
pub type Amount = u64;

/// Monotonic clock reading used for expiry windows.
pub type BlockHeight = u64;

/// The null account. Never a valid sender, recipient or fee beneficiary.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// The all-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Returns true for the null account.
pub fn is_zero_address(address: &Address) -> bool {
    *address == ZERO_ADDRESS
}

/// Short hex rendering for logs: first four bytes, e.g. `0xdd870fa1..`.
pub fn short_hex(bytes: &[u8]) -> String {
    let head = &bytes[..bytes.len().min(4)];
    format!("0x{}..", hex::encode(head))
}

/// Who is calling and how much value is attached to the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The calling account.
    pub caller: Address,
    /// Value attached to the call, in base units.
    pub value: Amount,
}

impl CallContext {
    /// A call without attached value.
    pub fn new(caller: Address) -> Self {
        Self { caller, value: 0 }
    }

    /// Attach value to the call.
    #[must_use]
    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }

    /// Whether any value is attached.
    pub fn is_payable(&self) -> bool {
        self.value > 0
    }
}
