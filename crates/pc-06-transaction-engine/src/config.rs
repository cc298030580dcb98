//! Configuration for the Transaction Engine subsystem

use serde::{Deserialize, Serialize};
use shared_types::{Amount, Height, FEE_QUANT, ONE_COIN};
use std::env;

/// Minimum fee schedule.
///
/// Below `reduction_height` every step costs one coin; from there on a step
/// costs `fee_quant`. A transaction pays one step plus one more for every
/// full `payload_bytes_per_step` bytes of appendage payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Height at which the reduced fee quantum takes effect
    pub reduction_height: Height,
    /// Fee step after the reduction
    pub fee_quant: Amount,
    /// Payload bytes covered by a single fee step
    pub payload_bytes_per_step: usize,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            reduction_height: 500_000,
            fee_quant: FEE_QUANT,
            payload_bytes_per_step: 176,
        }
    }
}

impl FeeSchedule {
    /// Fee of a single step at `height`.
    pub fn base_fee(&self, height: Height) -> Amount {
        if height < self.reduction_height {
            ONE_COIN
        } else {
            self.fee_quant
        }
    }

    /// Minimum fee for a transaction carrying `payload_len` bytes.
    pub fn minimum_fee(&self, height: Height, payload_len: usize) -> Amount {
        let extra_steps = payload_len
            .checked_div(self.payload_bytes_per_step)
            .unwrap_or(0);
        let steps = Amount::try_from(extra_steps)
            .unwrap_or(Amount::MAX)
            .saturating_add(1);
        self.base_fee(height).saturating_mul(steps)
    }
}

/// Transaction engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum fee schedule
    pub fees: FeeSchedule,
    /// Maximum message appendage length in bytes
    pub max_message_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fees: FeeSchedule::default(),
            max_message_len: 1000,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PC_FEE_REDUCTION_HEIGHT`: Height of the fee reduction (default: 500000)
    /// - `PC_FEE_QUANT`: Reduced fee step in planck (default: 735000)
    /// - `PC_FEE_PAYLOAD_STEP`: Payload bytes per fee step (default: 176)
    /// - `PC_MAX_MESSAGE_LEN`: Maximum message length (default: 1000)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
            value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        }

        let defaults = Self::default();
        Self {
            fees: FeeSchedule {
                reduction_height: parsed(
                    lookup("PC_FEE_REDUCTION_HEIGHT"),
                    defaults.fees.reduction_height,
                ),
                fee_quant: parsed(lookup("PC_FEE_QUANT"), defaults.fees.fee_quant),
                payload_bytes_per_step: parsed(
                    lookup("PC_FEE_PAYLOAD_STEP"),
                    defaults.fees.payload_bytes_per_step,
                ),
            },
            max_message_len: parsed(lookup("PC_MAX_MESSAGE_LEN"), defaults.max_message_len),
        }
    }
}
