//! Prometheus metrics for the hub and its spokes.
//!
//! All metrics follow the naming convention: `rh_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // HUB
    // =========================================================================

    /// Spoke instances deployed by any hub
    pub static ref INSTANCES_CREATED: Counter = Counter::new(
        "rh_hub_instances_created_total",
        "Total number of spoke instances deployed"
    ).expect("metric creation failed");

    /// Fees paid to hub owners
    pub static ref FEES_COLLECTED: Counter = Counter::new(
        "rh_hub_fees_collected_total",
        "Total fee value paid to hub owners"
    ).expect("metric creation failed");

    // =========================================================================
    // ESCROW
    // =========================================================================

    /// Commitments created
    pub static ref COMMITMENTS_CREATED: Counter = Counter::new(
        "rh_escrow_commitments_created_total",
        "Total number of commitments created"
    ).expect("metric creation failed");

    /// Commitments released to their recipient
    pub static ref RELEASES: Counter = Counter::new(
        "rh_escrow_releases_total",
        "Total number of commitments released"
    ).expect("metric creation failed");

    /// Expired commitments reclaimed by their sender
    pub static ref RECLAIMS: Counter = Counter::new(
        "rh_escrow_reclaims_total",
        "Total number of commitments reclaimed after expiry"
    ).expect("metric creation failed");

    /// Value currently locked under unreleased commitments
    pub static ref VALUE_LOCKED: Gauge = Gauge::new(
        "rh_escrow_value_locked",
        "Value locked under commitments that are neither released nor reclaimed"
    ).expect("metric creation failed");

    // =========================================================================
    // PAYOUT
    // =========================================================================

    /// Successful withdrawals
    pub static ref WITHDRAWALS: Counter = Counter::new(
        "rh_payout_withdrawals_total",
        "Total number of successful withdrawals"
    ).expect("metric creation failed");

    // =========================================================================
    // ERRORS
    // =========================================================================

    /// Rejected operations by operation and error kind
    pub static ref OPERATION_ERRORS: CounterVec = CounterVec::new(
        Opts::new("rh_operation_errors_total", "Rejected operations by type"),
        &["operation", "kind"]
    ).expect("metric creation failed");
}

static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Handle proving metrics have been registered.
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle {
    _private: (),
}

/// Register all metrics with the global registry.
///
/// Idempotent: later calls return the outcome of the first registration.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    register_once(&REGISTERED, &REGISTRY)
}

fn register_once(
    cell: &OnceLock<Result<(), String>>,
    registry: &Registry,
) -> Result<MetricsHandle, TelemetryError> {
    cell.get_or_init(|| register_all(registry).map_err(|e| e.to_string()))
        .clone()
        .map(|()| MetricsHandle { _private: () })
        .map_err(TelemetryError::MetricsInit)
}

fn register_all(registry: &Registry) -> prometheus::Result<()> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(INSTANCES_CREATED.clone()),
        Box::new(FEES_COLLECTED.clone()),
        Box::new(COMMITMENTS_CREATED.clone()),
        Box::new(RELEASES.clone()),
        Box::new(RECLAIMS.clone()),
        Box::new(VALUE_LOCKED.clone()),
        Box::new(WITHDRAWALS.clone()),
        Box::new(OPERATION_ERRORS.clone()),
    ];

    for metric in metrics {
        registry.register(metric)?;
    }
    Ok(())
}

/// Record a rejected operation.
pub fn record_error(operation: &str, kind: &str) {
    OPERATION_ERRORS.with_label_values(&[operation, kind]).inc();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
