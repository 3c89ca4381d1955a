//! Fee controller configuration

use super::*;
use crate::core::price::{Price, PriceStyle};
use serde::{Deserialize, Serialize};

/// Fee controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeControllerConfig {
    /// Lowest fee the controller will charge
    #[serde(default = "default_min_base_fee")]
    pub min_base_fee: Price,
    /// Highest fee the controller will charge
    #[serde(default = "default_max_base_fee")]
    pub max_base_fee: Price,
    /// Starting fee, restored on reset. Its representation decides the
    /// representation of quoted prices.
    #[serde(default = "default_base_fee")]
    pub default_base_fee: Price,
    /// Largest relative change a single adjustment may apply
    #[serde(default = "default_max_change_rate")]
    pub max_change_rate: f64,
    /// Fraction of peak capacity the controller steers towards
    #[serde(default = "default_target_utilization")]
    pub target_utilization: f64,
    /// Seconds of rate and fee history retained
    #[serde(default = "default_smoothing_window_secs")]
    pub smoothing_window_secs: u32,
    /// How much faster the fee climbs under congestion than it relaxes
    #[serde(default = "default_elasticity_multiplier")]
    pub elasticity_multiplier: f64,
    /// Minimum time between fee recomputations
    #[serde(default = "default_adjustment_interval_ms")]
    pub adjustment_interval_ms: u64,
    /// Requests per second treated as 100% utilization
    #[serde(default = "default_assumed_peak_capacity")]
    pub assumed_peak_capacity: f64,
}

impl Default for FeeControllerConfig {
    fn default() -> Self {
        Self {
            min_base_fee: default_min_base_fee(),
            max_base_fee: default_max_base_fee(),
            default_base_fee: default_base_fee(),
            max_change_rate: default_max_change_rate(),
            target_utilization: default_target_utilization(),
            smoothing_window_secs: default_smoothing_window_secs(),
            elasticity_multiplier: default_elasticity_multiplier(),
            adjustment_interval_ms: default_adjustment_interval_ms(),
            assumed_peak_capacity: default_assumed_peak_capacity(),
        }
    }
}

impl FeeControllerConfig {
    /// Apply the fields set in `patch`, keeping the rest
    pub fn merge(mut self, patch: FeeConfigPatch) -> Self {
        if let Some(v) = patch.min_base_fee {
            self.min_base_fee = v;
        }
        if let Some(v) = patch.max_base_fee {
            self.max_base_fee = v;
        }
        if let Some(v) = patch.default_base_fee {
            self.default_base_fee = v;
        }
        if let Some(v) = patch.max_change_rate {
            self.max_change_rate = v;
        }
        if let Some(v) = patch.target_utilization {
            self.target_utilization = v;
        }
        if let Some(v) = patch.smoothing_window_secs {
            self.smoothing_window_secs = v;
        }
        if let Some(v) = patch.elasticity_multiplier {
            self.elasticity_multiplier = v;
        }
        if let Some(v) = patch.adjustment_interval_ms {
            self.adjustment_interval_ms = v;
        }
        if let Some(v) = patch.assumed_peak_capacity {
            self.assumed_peak_capacity = v;
        }
        self
    }

    /// Request rate the controller steers towards
    pub fn target_rate_per_second(&self) -> f64 {
        self.target_utilization * self.assumed_peak_capacity
    }

    /// Representation used for quoted prices
    pub fn price_style(&self) -> PriceStyle {
        self.default_base_fee.style()
    }
}

/// Partial fee configuration; unset fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeeConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_base_fee: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_base_fee: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_base_fee: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_change_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing_window_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elasticity_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_interval_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumed_peak_capacity: Option<f64>,
}

impl FeeConfigPatch {
    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn overlay(mut self, other: Self) -> Self {
        self.min_base_fee = other.min_base_fee.or(self.min_base_fee);
        self.max_base_fee = other.max_base_fee.or(self.max_base_fee);
        self.default_base_fee = other.default_base_fee.or(self.default_base_fee);
        self.max_change_rate = other.max_change_rate.or(self.max_change_rate);
        self.target_utilization = other.target_utilization.or(self.target_utilization);
        self.smoothing_window_secs = other.smoothing_window_secs.or(self.smoothing_window_secs);
        self.elasticity_multiplier = other.elasticity_multiplier.or(self.elasticity_multiplier);
        self.adjustment_interval_ms =
            other.adjustment_interval_ms.or(self.adjustment_interval_ms);
        self.assumed_peak_capacity = other.assumed_peak_capacity.or(self.assumed_peak_capacity);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Build a configuration from the documented defaults plus `overrides`
pub fn create_config(overrides: FeeConfigPatch) -> FeeControllerConfig {
    FeeControllerConfig::default().merge(overrides)
}

/// Fee bounds in micro-dollars, produced by validating a
/// [`FeeControllerConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub min: u64,
    pub max: u64,
    pub default: u64,
    pub style: PriceStyle,
}

impl FeeSchedule {
    pub fn clamp(&self, micros: u64) -> u64 {
        micros.clamp(self.min, self.max)
    }
}
