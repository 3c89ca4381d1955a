//! Core functionality for request pricing
//!
//! This module contains the pricing algorithms and the types they operate on.

pub mod clock;
pub mod fee_controller; // Base-fee control loop
pub mod price;
pub mod rate_tracker; // Arrival bucketing and rate smoothing
