//! # Domain Entities
//!
//! The escrow record stored under each puzzle.

use super::errors::RemittanceError;
use super::value_objects::EscrowState;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, BlockHeight, Hash};

/// Value locked under a puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Commitment key.
    pub puzzle: Hash,
    /// Deposited amount, always positive.
    pub amount: Amount,
    /// Depositor, the only account that may reclaim.
    pub sender: Address,
    /// Height at creation.
    pub created_at: BlockHeight,
    /// Last height at which release is accepted.
    pub expiry: BlockHeight,
    /// Current state.
    pub state: EscrowState,
}

impl EscrowRecord {
    /// New locked record.
    pub fn new(
        puzzle: Hash,
        amount: Amount,
        sender: Address,
        created_at: BlockHeight,
        expiry: BlockHeight,
    ) -> Self {
        Self {
            puzzle,
            amount,
            sender,
            created_at,
            expiry,
            state: EscrowState::Locked,
        }
    }

    /// True once `current` has passed the expiry height.
    pub fn is_expired_at(&self, current: BlockHeight) -> bool {
        current > self.expiry
    }

    /// Released or reclaimed.
    pub fn is_completed(&self) -> bool {
        self.state.is_terminal()
    }

    /// Move to `target`, rejecting any transition out of a terminal state.
    pub fn transition(&mut self, target: EscrowState) -> Result<(), RemittanceError> {
        if !self.state.can_transition_to(target) {
            return Err(RemittanceError::AlreadyCompleted(self.puzzle));
        }
        self.state = target;
        Ok(())
    }
}
