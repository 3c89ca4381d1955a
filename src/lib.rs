//! # surge-pricing
//!
//! Demand-driven request pricing for API gateways, modelled on Ethereum's
//! EIP-1559 base fee: the per-request fee rises while traffic runs above a
//! target rate and relaxes while it runs below.
//!
//! ## Features
//!
//! - **Bounded memory**: second-granularity arrival buckets and a sliding
//!   history capped by the smoothing window
//! - **Deterministic**: time is always passed in, so identical event sequences
//!   produce identical fees
//! - **Concurrent**: one lock per controller; routes are independent
//! - **Exact money**: fees are integer micro-dollars internally
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use surge_pricing::{FeeConfigPatch, FeeController, Price, create_config};
//!
//! fn main() -> surge_pricing::Result<()> {
//!     let config = create_config(FeeConfigPatch {
//!         default_base_fee: Some(Price::text("$0.002")),
//!         ..Default::default()
//!     });
//!     let controller = FeeController::new(config, 1_700_000_000_000)?;
//!
//!     let fee = controller.quote(1_700_000_000_000);
//!     println!("Charge {} for this request", fee);
//!     Ok(())
//! }
//! ```
//!
//! ## Route Registry
//!
//! ```rust,no_run
//! use surge_pricing::{Clock, FeeRegistry, PricingConfig, SystemClock};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PricingConfig::from_file("config/pricing.yaml").await?;
//!     let registry = FeeRegistry::from_config(&config, SystemClock.now_ms())?;
//!
//!     let fee = registry.quote("/api/premium", SystemClock.now_ms())?;
//!     println!("{}", fee);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod services;
pub mod utils;

// Re-export main types
pub use config::{FeeConfigPatch, FeeControllerConfig, PricingConfig, Validate, create_config};
pub use core::clock::{Clock, ManualClock, SystemClock};
pub use core::fee_controller::{AdjustmentRegime, FeeController, FeeEvent, FeeMetrics};
pub use core::price::{MICROS_PER_DOLLAR, Price, PriceStyle};
pub use core::rate_tracker::RateTracker;
pub use services::FeeRegistry;
pub use utils::error::{PricingError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
