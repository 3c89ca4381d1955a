//! Base-fee control law
//!
//! A bounded multiplicative update on utilization (measured rate / target
//! rate). The fee climbs faster under congestion, where the step is scaled by
//! the elasticity multiplier, than it relaxes when idle. Between the target
//! utilization and 100% of the target rate it holds.

use super::types::{AdjustmentRegime, FeeAdjustment};
use crate::config::models::{FeeControllerConfig, FeeSchedule};

/// Multiplier to apply to the current fee at `utilization`
pub(super) fn fee_multiplier(
    utilization: f64,
    config: &FeeControllerConfig,
) -> (f64, AdjustmentRegime) {
    let max_change = config.max_change_rate;

    if utilization > 1.0 {
        let excess = utilization - 1.0;
        let step = (excess * max_change * config.elasticity_multiplier).min(max_change);
        (1.0 + step, AdjustmentRegime::Congested)
    } else if utilization < config.target_utilization {
        let shortage = (config.target_utilization - utilization) / config.target_utilization;
        let step = (shortage * max_change).min(max_change);
        (1.0 - step, AdjustmentRegime::Underused)
    } else {
        (1.0, AdjustmentRegime::Stable)
    }
}

/// Compute the next fee, or `None` when the target rate is not positive
pub(super) fn plan_adjustment(
    current_fee: u64,
    rate: f64,
    target_rate: f64,
    config: &FeeControllerConfig,
    schedule: &FeeSchedule,
) -> Option<FeeAdjustment> {
    if target_rate.is_nan() || target_rate <= 0.0 {
        return None;
    }

    let utilization = rate / target_rate;
    let (multiplier, regime) = fee_multiplier(utilization, config);
    // `as u64` saturates, so an absurd product still lands on max
    let scaled = (current_fee as f64 * multiplier).round() as u64;

    Some(FeeAdjustment {
        previous_fee: current_fee,
        new_fee: schedule.clamp(scaled),
        rate,
        target_rate,
        utilization,
        multiplier,
        regime,
    })
}
