//! Error types for the pricing core

use thiserror::Error;

/// Result type alias for the pricing core
pub type Result<T> = std::result::Result<T, PricingError>;

/// Main error type for the pricing core
///
/// Only construction, reconfiguration and config-file loading can fail.
/// Quoting a price never returns an error.
#[derive(Error, Debug)]
pub enum PricingError {
    /// Invalid bounds, fractions or intervals
    #[error("Configuration error: {0}")]
    Config(String),

    /// A monetary input that cannot be read as an amount
    #[error("Unparseable price: {0:?}")]
    UnparseablePrice(String),

    /// No controller is registered for the route
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
