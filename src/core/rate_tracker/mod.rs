//! Request Rate Tracking
//!
//! Converts an unbounded stream of arrival timestamps into a space-bounded,
//! smoothed requests-per-second estimate.

mod tracker;


// Re-export public types
pub use tracker::{BUCKET_WIDTH_MS, RateTracker};
