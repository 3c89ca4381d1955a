//! Configuration data models
//!
//! This module defines the configuration structures for fee controllers and
//! route pricing files.

pub mod fee;
pub mod pricing;

// Re-export all configuration types
pub use fee::*;
pub use pricing::*;

use crate::core::price::Price;

/// Default lowest fee
pub fn default_min_base_fee() -> Price {
    Price::text("$0.001")
}

/// Default highest fee
pub fn default_max_base_fee() -> Price {
    Price::text("$0.1")
}

/// Default starting fee
pub fn default_base_fee() -> Price {
    Price::text("$0.001")
}

/// Default largest relative change per adjustment (EIP-1559 uses 1/8)
pub fn default_max_change_rate() -> f64 {
    0.125
}

pub fn default_target_utilization() -> f64 {
    0.5
}

/// Default smoothing window in seconds
pub fn default_smoothing_window_secs() -> u32 {
    30
}

/// Default congestion elasticity (EIP-1559 block elasticity)
pub fn default_elasticity_multiplier() -> f64 {
    2.0
}

pub fn default_adjustment_interval_ms() -> u64 {
    1000
}

/// Default requests per second the protected resource is assumed to sustain
pub fn default_assumed_peak_capacity() -> f64 {
    20.0
}
