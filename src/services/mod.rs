//! Services module
//!
//! This module contains the services the gateway builds on top of the core

pub mod fee_registry;

pub use fee_registry::FeeRegistry;
