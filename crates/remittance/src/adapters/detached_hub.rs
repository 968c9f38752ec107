//! Hub reference for spokes deployed outside any factory.

use crate::ports::outbound::HubRegistry;
use shared_types::{Address, Amount};

/// Points at a caller-supplied hub address that never recognizes the spoke.
///
/// Spokes built on it can generate puzzles but reject every deposit.
#[derive(Debug, Clone, Copy)]
pub struct DetachedHub {
    address: Address,
}

impl DetachedHub {
    /// Reference to `address`.
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl HubRegistry for DetachedHub {
    fn hub_address(&self) -> Address {
        self.address
    }

    fn is_authorized_instance(&self, _instance: &Address) -> bool {
        false
    }

    fn fee_amount(&self) -> Amount {
        0
    }

    fn fee_recipient(&self) -> Address {
        self.address
    }
}
