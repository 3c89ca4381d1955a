//! Helper functions for creating specific error types

use super::types::PricingError;

impl PricingError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn unparseable_price<S: Into<String>>(input: S) -> Self {
        Self::UnparseablePrice(input.into())
    }

    pub fn route_not_found<S: Into<String>>(route: S) -> Self {
        Self::RouteNotFound(route.into())
    }

    /// Whether the error was caused by the caller's configuration rather than
    /// by the environment (files, parsing of the config document).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnparseablePrice(_))
    }
}
