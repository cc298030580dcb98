//! Prometheus metrics for Capacity-Chain subsystems.
//!
//! All metrics follow the naming convention: `pc_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRANSACTION ENGINE METRICS (Subsystem 6)
    // =========================================================================

    /// Validation outcomes
    pub static ref ENGINE_VALIDATIONS: CounterVec = CounterVec::new(
        Opts::new("pc_engine_validations_total", "Transaction validations by outcome"),
        &["outcome"]  // outcome: valid/transient/permanent
    ).expect("metric creation failed");

    /// Unconfirmed reservations
    pub static ref ENGINE_RESERVATIONS: CounterVec = CounterVec::new(
        Opts::new("pc_engine_reservations_total", "Unconfirmed balance reservations by outcome"),
        &["kind", "outcome"]  // outcome: reserved/rejected/duplicate_removal
    ).expect("metric creation failed");

    /// Transactions committed to confirmed balances
    pub static ref ENGINE_APPLIED: CounterVec = CounterVec::new(
        Opts::new("pc_engine_applied_total", "Transactions applied to confirmed state"),
        &["kind"]
    ).expect("metric creation failed");

    /// Reservations released
    pub static ref ENGINE_RELEASED: Counter = Counter::new(
        "pc_engine_released_total",
        "Unconfirmed reservations released"
    ).expect("metric creation failed");

    /// Per-block state resets
    pub static ref ENGINE_BLOCKS_STARTED: Counter = Counter::new(
        "pc_engine_blocks_started_total",
        "Number of times per-block state was reset"
    ).expect("metric creation failed");

    /// Engine failures by type
    pub static ref ENGINE_ERRORS: CounterVec = CounterVec::new(
        Opts::new("pc_engine_errors_total", "Engine errors by type"),
        &["error_type"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ENGINE_VALIDATIONS.clone()),
        Box::new(ENGINE_RESERVATIONS.clone()),
        Box::new(ENGINE_APPLIED.clone()),
        Box::new(ENGINE_RELEASED.clone()),
        Box::new(ENGINE_BLOCKS_STARTED.clone()),
        Box::new(ENGINE_ERRORS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
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
