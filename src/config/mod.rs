//! Configuration management for fee controllers
//!
//! This module handles loading, validation, and management of pricing configuration.

mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;
