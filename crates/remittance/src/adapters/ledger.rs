//! In-memory value ledger
//!
//! Implements `ValueTransfer` over a map of account balances. Destinations
//! can be told to refuse value, which is how payout failures are exercised.

use crate::domain::TransferError;
use crate::ports::outbound::ValueTransfer;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{is_zero_address, short_hex, Address, Amount};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// In-memory ledger for tests and local runs.
#[derive(Default)]
pub struct InMemoryLedger {
    accounts: RwLock<HashMap<Address, Amount>>,
    rejecting: RwLock<HashSet<Address>>,
}

impl InMemoryLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` out of thin air. Saturates at `Amount::MAX`.
    ///
    /// Returns the new balance.
    pub fn mint(&self, account: Address, amount: Amount) -> Amount {
        let mut accounts = self.accounts.write();
        let balance = accounts.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
        *balance
    }

    /// Make every transfer into `account` fail.
    pub fn reject_transfers_to(&self, account: Address) {
        self.rejecting.write().insert(account);
    }

    /// Undo `reject_transfers_to`.
    pub fn accept_transfers_to(&self, account: Address) {
        self.rejecting.write().remove(&account);
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.accounts.read().values().map(|v| u128::from(*v)).sum()
    }

    /// Synchronous balance lookup.
    pub fn balance(&self, account: &Address) -> Amount {
        self.accounts.read().get(account).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ValueTransfer for InMemoryLedger {
    async fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if is_zero_address(&to) {
            return Err(TransferError::ZeroDestination);
        }
        if from == to {
            return Err(TransferError::SelfTransfer(to));
        }
        if self.rejecting.read().contains(&to) {
            return Err(TransferError::Rejected(to));
        }

        let mut accounts = self.accounts.write();
        let available = accounts.get(&from).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                account: from,
                available,
                requested: amount,
            });
        }

        let destination = accounts.get(&to).copied().unwrap_or(0);
        let credited = destination
            .checked_add(amount)
            .ok_or(TransferError::Overflow(to))?;
        accounts.insert(from, available - amount);
        accounts.insert(to, credited);

        debug!(
            from = %short_hex(&from),
            to = %short_hex(&to),
            amount,
            "Ledger transfer"
        );
        Ok(())
    }

    async fn balance_of(&self, account: Address) -> Amount {
        self.balance(&account)
    }
}
