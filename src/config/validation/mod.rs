//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `fee_validators`: Fee controller and route pricing validators
//! - `tests`: Test suite for all validators

mod fee_validators;
mod trait_def;

pub use trait_def::Validate;
