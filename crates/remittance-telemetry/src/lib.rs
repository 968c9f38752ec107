//! # Remittance Telemetry
//!
//! Logging and metrics for the remittance hub.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` registry with env filter, pretty or JSON
//! - **Metrics**: Prometheus counters for instances, commitments, releases,
//!   reclaims, withdrawals, fees and rejected operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use remittance_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RH_SERVICE_NAME` | `remittance-hub` | Service name in logs |
//! | `RH_LOG_LEVEL` | `info` | Log level filter |
//! | `RH_JSON_LOGS` | `false` | JSON formatted logs |
//! | `RH_NETWORK` | `devnet` | Network identifier |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{
    encode_metrics, record_error, register_metrics, MetricsHandle, COMMITMENTS_CREATED,
    FEES_COLLECTED, INSTANCES_CREATED, OPERATION_ERRORS, RECLAIMS, RELEASES, VALUE_LOCKED,
    WITHDRAWALS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed or could not be built.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(&config)?;

    Ok(TelemetryGuard {
        service: config.full_service_name(),
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service: String,
    _metrics: MetricsHandle,
}

impl TelemetryGuard {
    /// Name the telemetry was initialized for.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service, "Shutting down telemetry");
    }
}
