//! Fee configuration validators
//!
//! Validation fails fast: out-of-range values are reported, never clamped.

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::price::Price;
use crate::utils::error::{self, PricingError};
use tracing::debug;

impl Validate for FeeControllerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating fee controller configuration");

        let min = price_micros("min_base_fee", &self.min_base_fee)?;
        let max = price_micros("max_base_fee", &self.max_base_fee)?;
        let default = price_micros("default_base_fee", &self.default_base_fee)?;

        if min == 0 {
            return Err("min_base_fee must be greater than 0".to_string());
        }
        if min > max {
            return Err(format!(
                "min_base_fee ({}) must not exceed max_base_fee ({})",
                self.min_base_fee, self.max_base_fee
            ));
        }
        if default < min || default > max {
            return Err(format!(
                "default_base_fee ({}) must be within [{}, {}]",
                self.default_base_fee, self.min_base_fee, self.max_base_fee
            ));
        }

        if !self.max_change_rate.is_finite() || !(0.0..=1.0).contains(&self.max_change_rate) {
            return Err(format!(
                "max_change_rate must be in [0, 1], got {}",
                self.max_change_rate
            ));
        }

        if !self.target_utilization.is_finite()
            || self.target_utilization <= 0.0
            || self.target_utilization > 1.0
        {
            return Err(format!(
                "target_utilization must be in (0, 1], got {}",
                self.target_utilization
            ));
        }

        if self.smoothing_window_secs == 0 {
            return Err("smoothing_window_secs must be greater than 0".to_string());
        }

        if !self.elasticity_multiplier.is_finite() || self.elasticity_multiplier <= 0.0 {
            return Err(format!(
                "elasticity_multiplier must be greater than 0, got {}",
                self.elasticity_multiplier
            ));
        }

        if self.adjustment_interval_ms == 0 {
            return Err("adjustment_interval_ms must be greater than 0".to_string());
        }

        // Zero capacity is accepted: the controller then holds the default
        // fee and reports a degenerate target instead of failing.
        if !self.assumed_peak_capacity.is_finite() || self.assumed_peak_capacity < 0.0 {
            return Err(format!(
                "assumed_peak_capacity must be a non-negative number, got {}",
                self.assumed_peak_capacity
            ));
        }

        Ok(())
    }
}

impl Validate for PricingConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating pricing configuration");

        for (route, config) in self.route_configs() {
            if route.trim().is_empty() {
                return Err("Route name cannot be empty".to_string());
            }
            config
                .validate()
                .map_err(|e| format!("Route {}: {}", route, e))?;
        }

        Ok(())
    }
}

impl FeeControllerConfig {
    /// Validate and convert the fee bounds to micro-dollars
    ///
    /// Prices that cannot be read are reported as
    /// [`PricingError::UnparseablePrice`]; every other problem is a
    /// [`PricingError::Config`].
    pub fn resolve(&self) -> error::Result<FeeSchedule> {
        let (min, max, default) = self.parse_prices()?;

        self.validate().map_err(PricingError::Config)?;

        Ok(FeeSchedule {
            min,
            max,
            default,
            style: self.price_style(),
        })
    }

    fn parse_prices(&self) -> error::Result<(u64, u64, u64)> {
        Ok((
            self.min_base_fee.to_micros()?,
            self.max_base_fee.to_micros()?,
            self.default_base_fee.to_micros()?,
        ))
    }
}

impl PricingConfig {
    /// Validate every route with typed errors
    ///
    /// An unreadable price in any route is reported as
    /// [`PricingError::UnparseablePrice`]; other problems are
    /// [`PricingError::Config`] naming the route.
    pub fn check(&self) -> error::Result<()> {
        for (_, config) in self.route_configs() {
            config.parse_prices()?;
        }
        self.validate().map_err(PricingError::Config)
    }
}

fn price_micros(field: &str, price: &Price) -> Result<u64, String> {
    price
        .to_micros()
        .map_err(|_| format!("{} is not a valid price: {:?}", field, price.to_string()))
}
