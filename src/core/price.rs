//! Monetary amounts
//!
//! Fees are held internally as integer micro-dollars (6 decimals, the same
//! granularity as USDC atomic units) and converted to the caller's
//! representation only at the boundary.

use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minor units per dollar
pub const MICROS_PER_DOLLAR: u64 = 1_000_000;

/// Minor units per displayed decimal place (`$0.0001`)
const MICROS_PER_DISPLAY_UNIT: u64 = 100;

/// A price as supplied by configuration or returned to the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    /// Dollar amount as a number, e.g. `0.0012`
    Amount(f64),
    /// Fixed-point decimal string, e.g. `"$0.0012"`
    Text(String),
}

/// Output representation of a [`Price`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceStyle {
    /// `"$0.0012"`
    #[default]
    Text,
    /// `0.0012`
    Amount,
}

impl Price {
    /// Create a string-style price
    pub fn text<S: Into<String>>(value: S) -> Self {
        Self::Text(value.into())
    }

    /// Representation this price was written in
    pub fn style(&self) -> PriceStyle {
        match self {
            Self::Amount(_) => PriceStyle::Amount,
            Self::Text(_) => PriceStyle::Text,
        }
    }

    /// Convert to micro-dollars, rounding to the nearest minor unit
    pub fn to_micros(&self) -> Result<u64> {
        match self {
            Self::Amount(value) => dollars_to_micros(*value)
                .ok_or_else(|| PricingError::unparseable_price(value.to_string())),
            Self::Text(raw) => parse_text(raw)
                .ok_or_else(|| PricingError::unparseable_price(raw.clone())),
        }
    }

    /// Render micro-dollars in the given representation
    pub fn from_micros(micros: u64, style: PriceStyle) -> Self {
        match style {
            PriceStyle::Amount => Self::Amount(micros as f64 / MICROS_PER_DOLLAR as f64),
            PriceStyle::Text => {
                let half_up = micros % MICROS_PER_DISPLAY_UNIT >= MICROS_PER_DISPLAY_UNIT / 2;
                let units = micros / MICROS_PER_DISPLAY_UNIT + u64::from(half_up);
                Self::Text(format!("${}.{:04}", units / 10_000, units % 10_000))
            }
        }
    }

    /// Dollar value of this price
    pub fn as_dollars(&self) -> Result<f64> {
        Ok(self.to_micros()? as f64 / MICROS_PER_DOLLAR as f64)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(value) => write!(f, "{value}"),
            Self::Text(raw) => f.write_str(raw),
        }
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Self::Amount(value)
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

fn parse_text(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();

    // str::parse::<f64> also accepts "inf", "-1" and "1e3"; only plain
    // decimals are valid prices.
    let well_formed = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if !well_formed {
        return None;
    }

    digits.parse::<f64>().ok().and_then(dollars_to_micros)
}

fn dollars_to_micros(dollars: f64) -> Option<u64> {
    if !dollars.is_finite() || dollars < 0.0 {
        return None;
    }
    let micros = (dollars * MICROS_PER_DOLLAR as f64).round();
    // u64::MAX as f64 rounds up to 2^64, one past the largest u64.
    if micros >= u64::MAX as f64 {
        return None;
    }
    Some(micros as u64)
}
