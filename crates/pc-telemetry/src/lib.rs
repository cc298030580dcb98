//! # Capacity-Chain Telemetry
//!
//! Logging bootstrap and Prometheus metrics shared by the subsystems.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pc_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::for_subsystem("06", "transaction-engine");
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PC_SERVICE_NAME` | `capacity-chain` | Service name in logs |
//! | `PC_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `PC_JSON_LOGS` | `false` | JSON formatted logs |
//! | `PC_CONSOLE_OUTPUT` | `true` | Console output |

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, ENGINE_APPLIED, ENGINE_BLOCKS_STARTED, ENGINE_ERRORS,
    ENGINE_RELEASED, ENGINE_RESERVATIONS, ENGINE_VALIDATIONS,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_tracing(config)
}
