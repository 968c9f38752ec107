//! # Service Layer
//!
//! The hub (factory) and spoke (escrow instance) services wired to their
//! outbound ports.

mod hub;
mod spoke;

pub use hub::RemittanceHub;
pub use spoke::RemittanceSpoke;

use crate::domain::RemittanceError;
use crate::ports::outbound::{Clock, ValueTransfer};
use remittance_telemetry::record_error;
use shared_bus::EventPublisher;
use std::sync::Arc;
use tracing::warn;

/// Outbound collaborators shared by a hub and every spoke it deploys.
#[derive(Clone)]
pub struct RemittanceEnv {
    /// Value-transfer primitive.
    pub ledger: Arc<dyn ValueTransfer>,
    /// Expiry clock.
    pub clock: Arc<dyn Clock>,
    /// Audit event sink.
    pub events: Arc<dyn EventPublisher>,
}

impl RemittanceEnv {
    /// Bundle the collaborators.
    pub fn new(
        ledger: Arc<dyn ValueTransfer>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            ledger,
            clock,
            events,
        }
    }
}

/// Log and count a rejected operation, passing the result through.
pub(crate) fn observe<T>(
    operation: &'static str,
    result: Result<T, RemittanceError>,
) -> Result<T, RemittanceError> {
    if let Err(e) = &result {
        let kind = e.kind().as_str();
        warn!(operation, kind, error = %e, "Operation rejected");
        record_error(operation, kind);
    }
    result
}
