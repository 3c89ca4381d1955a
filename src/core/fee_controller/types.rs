//! Fee controller types and data structures

use crate::core::price::Price;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Observability snapshot of a controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeMetrics {
    /// Estimated requests per second
    pub current_rps: f64,
    /// Requests per second the controller steers towards
    pub target_rps: f64,
    /// `current_rps / target_rps` as a percentage, e.g. `"80.0%"`
    pub utilization: String,
    /// Fee currently being quoted
    pub current_fee: Price,
    /// Requests counted in buckets inside the smoothing window
    pub request_count: u64,
    /// Seconds inside the window that saw at least one request
    pub active_seconds: usize,
    /// Entries in the fee history
    pub fee_history_len: usize,
    /// Entries in the rate smoothing history
    pub rate_history_len: usize,
    /// Up to five most recent fees, oldest first
    pub recent_fees: Vec<Price>,
    /// Time of the last adjustment (ms since epoch)
    pub last_adjustment_ms: i64,
}

impl FeeMetrics {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Which branch of the control law produced an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentRegime {
    /// Demand above the target rate; the fee rises
    Congested,
    /// Demand below the target utilization; the fee falls
    Underused,
    /// Demand inside the dead band; the fee holds
    Stable,
}

/// Outcome of one run of the control law, in micro-dollars
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeAdjustment {
    pub previous_fee: u64,
    pub new_fee: u64,
    pub rate: f64,
    pub target_rate: f64,
    pub utilization: f64,
    pub multiplier: f64,
    pub regime: AdjustmentRegime,
}

/// Events published by a controller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeEvent {
    /// The fee was recomputed
    Adjusted {
        at_ms: i64,
        previous_fee: Price,
        new_fee: Price,
        utilization: f64,
        regime: AdjustmentRegime,
    },
    /// The target rate is not positive, so the default fee was returned
    DegenerateTarget { at_ms: i64, target_rate: f64 },
    /// The controller was reset to its default fee
    Reset { fee: Price },
    /// The configuration was replaced
    ConfigUpdated { target_rate: f64 },
}
