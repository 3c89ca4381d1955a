//! The `Validate` trait shared by pricing configuration types

/// Structural checks on a pricing configuration
///
/// Implemented by [`FeeControllerConfig`](crate::config::FeeControllerConfig)
/// and [`PricingConfig`](crate::config::PricingConfig). The error message
/// names the offending field (and route, for a pricing document) and is
/// surfaced as [`PricingError::Config`](crate::PricingError::Config) by
/// `resolve` and `check`, which parse prices first so an unreadable price
/// keeps its own error variant.
pub trait Validate {
    /// Check bounds, ratios and intervals without building a fee schedule
    fn validate(&self) -> Result<(), String>;
}
