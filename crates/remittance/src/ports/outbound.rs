//! # Outbound Ports
//!
//! What the hub and its spokes need from the outside world: a way to move
//! value, a clock, and (for a spoke) a view of the hub that deployed it.

use crate::domain::TransferError;
use async_trait::async_trait;
use shared_types::{Address, Amount, BlockHeight};

/// Value-transfer primitive.
///
/// A transfer either moves the full amount or fails without effect.
#[async_trait]
pub trait ValueTransfer: Send + Sync {
    /// Move `amount` from `from` to `to`.
    async fn transfer(&self, from: Address, to: Address, amount: Amount)
        -> Result<(), TransferError>;

    /// Current balance of `account`.
    async fn balance_of(&self, account: Address) -> Amount;
}

/// Monotonic clock used for expiry windows.
pub trait Clock: Send + Sync {
    /// Current height.
    fn current_height(&self) -> BlockHeight;
}

/// A spoke's view of its hub.
pub trait HubRegistry: Send + Sync {
    /// Address of the hub.
    fn hub_address(&self) -> Address;

    /// Whether `instance` was deployed by this hub.
    fn is_authorized_instance(&self, instance: &Address) -> bool;

    /// Fee charged on each successful release.
    fn fee_amount(&self) -> Amount;

    /// Account the fee is paid to.
    fn fee_recipient(&self) -> Address;
}
