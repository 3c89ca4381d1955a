//! Error handling for the pricing core
//!
//! This module defines all error types used throughout the crate.

mod helpers;
mod types;

pub use types::{PricingError, Result};
