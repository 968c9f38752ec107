//! # Domain Value Objects

use serde::{Deserialize, Serialize};

/// Escrow state machine.
///
/// ```text
/// Locked ──release──▶ Released
///    │
///    └────reclaim───▶ Reclaimed
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowState {
    /// Value held, awaiting release or expiry.
    #[default]
    Locked,
    /// Recipient proved the secret and was credited.
    Released,
    /// Sender took the value back after expiry.
    Reclaimed,
}

impl EscrowState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, target: EscrowState) -> bool {
        matches!(
            (self, target),
            (EscrowState::Locked, EscrowState::Released)
                | (EscrowState::Locked, EscrowState::Reclaimed)
        )
    }

    /// Released or reclaimed. Terminal states never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EscrowState::Locked)
    }
}
