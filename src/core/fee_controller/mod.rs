//! Demand-driven base-fee controller
//!
//! Quotes a per-request fee that rises when the observed request rate exceeds
//! the target and relaxes when it falls below the target utilization.

mod control_law;
mod controller;
mod types;

pub use controller::FeeController;
pub use types::{AdjustmentRegime, FeeEvent, FeeMetrics};
