//! # Remittance Events
//!
//! Audit events emitted by the hub and its spokes. Events are published only
//! after the operation that produced them has fully succeeded.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, BlockHeight, Hash};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemittanceEvent {
    // =========================================================================
    // HUB
    // =========================================================================
    /// The hub deployed a new spoke instance.
    InstanceCreated {
        /// The deploying hub.
        hub: Address,
        /// Address of the new instance.
        instance: Address,
    },

    // =========================================================================
    // ESCROW
    // =========================================================================
    /// Value was locked under a puzzle.
    TransactionCreated {
        /// Instance holding the value.
        instance: Address,
        /// Commitment key.
        puzzle: Hash,
        /// Depositor.
        sender: Address,
        /// Locked amount.
        amount: Amount,
        /// Height after which the recipient can no longer release.
        expiry: BlockHeight,
    },

    /// The recipient proved the secret and was credited.
    TransactionCompleted {
        /// Instance holding the value.
        instance: Address,
        /// Commitment key.
        puzzle: Hash,
        /// Credited account.
        recipient: Address,
        /// Amount credited after the hub fee.
        net: Amount,
        /// Fee paid to the hub owner.
        fee: Amount,
    },

    /// An expired commitment was credited back to its sender.
    Reclaimed {
        /// Instance holding the value.
        instance: Address,
        /// Commitment key.
        puzzle: Hash,
        /// Original depositor.
        sender: Address,
        /// Amount credited back.
        amount: Amount,
    },

    // =========================================================================
    // PAYOUT
    // =========================================================================
    /// A credited balance was transferred out.
    Withdrawn {
        /// Instance paying out.
        instance: Address,
        /// Receiving account.
        recipient: Address,
        /// Transferred amount.
        amount: Amount,
    },
}

impl RemittanceEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::InstanceCreated { .. } => EventTopic::Hub,
            Self::TransactionCreated { .. }
            | Self::TransactionCompleted { .. }
            | Self::Reclaimed { .. } => EventTopic::Escrow,
            Self::Withdrawn { .. } => EventTopic::Payout,
        }
    }

    /// Address of the spoke instance this event concerns.
    #[must_use]
    pub fn instance(&self) -> Address {
        match self {
            Self::InstanceCreated { instance, .. }
            | Self::TransactionCreated { instance, .. }
            | Self::TransactionCompleted { instance, .. }
            | Self::Reclaimed { instance, .. }
            | Self::Withdrawn { instance, .. } => *instance,
        }
    }

    /// Short name used in logs and metrics labels.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InstanceCreated { .. } => "InstanceCreated",
            Self::TransactionCreated { .. } => "TransactionCreated",
            Self::TransactionCompleted { .. } => "TransactionCompleted",
            Self::Reclaimed { .. } => "Reclaimed",
            Self::Withdrawn { .. } => "Withdrawn",
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Instance deployment.
    Hub,
    /// Commitment lifecycle (create, release, reclaim).
    Escrow,
    /// Withdrawals.
    Payout,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Instances to include. Empty means all instances.
    pub instances: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            instances: Vec::new(),
        }
    }

    /// Create a filter for events concerning specific instances.
    #[must_use]
    pub fn for_instances(instances: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            instances,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &RemittanceEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let instance_match =
            self.instances.is_empty() || self.instances.contains(&event.instance());

        topic_match && instance_match
    }
}
