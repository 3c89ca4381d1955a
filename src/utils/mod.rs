//! Utility modules

pub mod error; // Error handling
