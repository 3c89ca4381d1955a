//! Configuration loading utilities
//!
//! This module provides utilities for loading configuration from YAML files
//! and environment variables.

use super::models::*;
use crate::core::price::Price;
use crate::utils::error::{PricingError, Result};
use std::env;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Prefix of the environment variables read by [`FeeConfigPatch::from_env`]
pub const ENV_PREFIX: &str = "SURGE_";

impl PricingConfig {
    /// Load and validate a pricing file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading pricing configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml_str(&content)?;

        debug!(routes = config.routes.len(), "Pricing configuration loaded");
        Ok(config)
    }

    /// Parse and validate a pricing document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Render as a YAML document
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Layer `SURGE_*` environment variables over the shared defaults
    pub fn with_env_overrides(mut self) -> Result<Self> {
        let overrides = FeeConfigPatch::from_env()?;
        if !overrides.is_empty() {
            info!("Applying pricing overrides from environment variables");
            self.defaults = self.defaults.overlay(overrides);
            self.check()?;
        }
        Ok(self)
    }
}

impl FeeConfigPatch {
    /// Read overrides from `SURGE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let price = |name: &str| lookup(&var_name(name)).map(Price::Text);

        Ok(Self {
            min_base_fee: price("MIN_BASE_FEE"),
            max_base_fee: price("MAX_BASE_FEE"),
            default_base_fee: price("DEFAULT_BASE_FEE"),
            max_change_rate: parse_var(&lookup, "MAX_CHANGE_RATE")?,
            target_utilization: parse_var(&lookup, "TARGET_UTILIZATION")?,
            smoothing_window_secs: parse_var(&lookup, "SMOOTHING_WINDOW_SECS")?,
            elasticity_multiplier: parse_var(&lookup, "ELASTICITY_MULTIPLIER")?,
            adjustment_interval_ms: parse_var(&lookup, "ADJUSTMENT_INTERVAL_MS")?,
            assumed_peak_capacity: parse_var(&lookup, "ASSUMED_PEAK_CAPACITY")?,
        })
    }
}

fn var_name(name: &str) -> String {
    format!("{}{}", ENV_PREFIX, name)
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let key = var_name(name);
    lookup(&key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| PricingError::Config(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}
