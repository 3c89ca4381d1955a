//! Core fee controller implementation

use super::control_law::plan_adjustment;
use super::types::{FeeEvent, FeeMetrics};
use crate::config::models::{FeeConfigPatch, FeeControllerConfig, FeeSchedule};
use crate::core::price::Price;
use crate::core::rate_tracker::RateTracker;
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Capacity of the event channel; slow subscribers observe `Lagged`
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Fees reported in [`FeeMetrics::recent_fees`]
const RECENT_FEE_COUNT: usize = 5;

/// Demand-driven base-fee controller for a single route
///
/// Every operation takes `&self`; state lives behind one mutex so a quote,
/// its rate sample and any adjustment it triggers are applied atomically.
/// Events are published after the lock is released.
#[derive(Debug)]
pub struct FeeController {
    pub(super) state: Mutex<FeeState>,
    event_sender: broadcast::Sender<FeeEvent>,
}

#[derive(Debug)]
pub(super) struct FeeState {
    pub(super) config: FeeControllerConfig,
    pub(super) schedule: FeeSchedule,
    pub(super) target_rate: f64,
    /// Micro-dollars
    pub(super) current_fee: u64,
    pub(super) fee_history: VecDeque<u64>,
    pub(super) last_adjustment_ms: i64,
    /// Instant of the last applied adjustment; a second adjustment at the
    /// same instant is a no-op
    pub(super) adjusted_at_ms: Option<i64>,
    pub(super) tracker: RateTracker,
}

impl FeeController {
    /// Create a controller, validating `config`
    ///
    /// `now_ms` seeds the adjustment clock, so the first adjustment happens
    /// one interval after construction.
    pub fn new(config: FeeControllerConfig, now_ms: i64) -> Result<Self> {
        let schedule = config.resolve()?;
        let target_rate = config.target_rate_per_second();
        let (event_sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        info!(
            target_rate,
            default_fee = %config.default_base_fee,
            window_secs = config.smoothing_window_secs,
            "Fee controller initialized"
        );

        Ok(Self {
            state: Mutex::new(FeeState {
                tracker: RateTracker::new(config.smoothing_window_secs),
                fee_history: VecDeque::with_capacity(config.smoothing_window_secs as usize),
                current_fee: schedule.default,
                last_adjustment_ms: now_ms,
                adjusted_at_ms: None,
                target_rate,
                schedule,
                config,
            }),
            event_sender,
        })
    }

    /// Record one request and return the fee to charge for it
    ///
    /// Runs an adjustment first when at least one adjustment interval has
    /// elapsed since the last one.
    pub fn quote(&self, now_ms: i64) -> Price {
        let (price, event) = {
            let mut state = self.state.lock();
            state.tracker.record(now_ms);
            state.tracker.current_rate(now_ms);

            let mut event = None;
            if now_ms.saturating_sub(state.last_adjustment_ms) >= state.interval_ms() {
                event = state.adjust(now_ms).1;
                state.last_adjustment_ms = now_ms;
            }
            (state.price(state.current_fee), event)
        };

        self.publish(event);
        price
    }

    /// Recompute the fee from the current rate
    ///
    /// Does not move the adjustment clock. With a non-positive target rate the
    /// default fee is returned and the current fee is left untouched.
    pub fn adjust_fee(&self, now_ms: i64) -> Price {
        let (price, event) = {
            let mut state = self.state.lock();
            let (fee, event) = state.adjust(now_ms);
            (state.price(fee), event)
        };

        self.publish(event);
        price
    }

    /// Adjust immediately, ignoring the interval, and restart the interval
    pub fn force_adjustment(&self, now_ms: i64) -> Price {
        let (price, event) = {
            let mut state = self.state.lock();
            let (fee, event) = state.adjust(now_ms);
            state.last_adjustment_ms = now_ms;
            (state.price(fee), event)
        };

        self.publish(event);
        price
    }

    /// Snapshot of the controller, without mutating it
    pub fn metrics(&self, now_ms: i64) -> FeeMetrics {
        let state = self.state.lock();
        let rate = state.tracker.peek_rate(now_ms);
        let utilization = if state.target_rate > 0.0 {
            format!("{:.1}%", rate * 100.0 / state.target_rate)
        } else {
            "0.0%".to_string()
        };

        let skip = state.fee_history.len().saturating_sub(RECENT_FEE_COUNT);
        FeeMetrics {
            current_rps: rate,
            target_rps: state.target_rate,
            utilization,
            current_fee: state.price(state.current_fee),
            request_count: state.tracker.request_count(now_ms),
            active_seconds: state.tracker.active_seconds(now_ms),
            fee_history_len: state.fee_history.len(),
            rate_history_len: state.tracker.history_len(),
            recent_fees: state
                .fee_history
                .iter()
                .skip(skip)
                .map(|&fee| state.price(fee))
                .collect(),
            last_adjustment_ms: state.last_adjustment_ms,
        }
    }

    /// Restore the default fee and forget all rate and fee history
    pub fn reset(&self) {
        let fee = {
            let mut state = self.state.lock();
            state.current_fee = state.schedule.default;
            state.fee_history.clear();
            state.tracker.reset();
            state.adjusted_at_ms = None;
            state.price(state.current_fee)
        };

        info!(fee = %fee, "Fee controller reset");
        self.publish(Some(FeeEvent::Reset { fee }));
    }

    /// Merge `patch` into the configuration
    ///
    /// The merged configuration is validated first; on error nothing changes.
    /// The current fee is clamped into the new bounds and histories are
    /// trimmed to the new window.
    pub fn update_config(&self, patch: FeeConfigPatch) -> Result<()> {
        let target_rate = {
            let mut state = self.state.lock();
            let config = state.config.clone().merge(patch);
            let schedule = config.resolve()?;

            state.target_rate = config.target_rate_per_second();
            state.tracker.set_window(config.smoothing_window_secs);
            while state.fee_history.len() > config.smoothing_window_secs as usize {
                state.fee_history.pop_front();
            }
            state.current_fee = schedule.clamp(state.current_fee);
            state.schedule = schedule;
            state.config = config;
            state.target_rate
        };

        info!(target_rate, "Fee controller configuration updated");
        self.publish(Some(FeeEvent::ConfigUpdated { target_rate }));
        Ok(())
    }

    /// Fee currently being quoted
    pub fn current_fee(&self) -> Price {
        let state = self.state.lock();
        state.price(state.current_fee)
    }

    /// Requests per second the controller steers towards
    pub fn target_rate(&self) -> f64 {
        self.state.lock().target_rate
    }

    /// Copy of the active configuration
    pub fn config(&self) -> FeeControllerConfig {
        self.state.lock().config.clone()
    }

    /// Subscribe to controller events
    pub fn subscribe(&self) -> broadcast::Receiver<FeeEvent> {
        self.event_sender.subscribe()
    }

    fn publish(&self, event: Option<FeeEvent>) {
        if let Some(event) = event {
            // No subscribers is not an error
            let _ = self.event_sender.send(event);
        }
    }
}

impl FeeState {
    fn price(&self, micros: u64) -> Price {
        Price::from_micros(micros, self.schedule.style)
    }

    fn interval_ms(&self) -> i64 {
        i64::try_from(self.config.adjustment_interval_ms).unwrap_or(i64::MAX)
    }

    /// Run the control law once, returning the fee to report
    fn adjust(&mut self, now_ms: i64) -> (u64, Option<FeeEvent>) {
        if self.adjusted_at_ms == Some(now_ms) {
            return (self.current_fee, None);
        }

        let rate = self.tracker.current_rate(now_ms);
        let Some(plan) = plan_adjustment(
            self.current_fee,
            rate,
            self.target_rate,
            &self.config,
            &self.schedule,
        ) else {
            warn!(
                target_rate = self.target_rate,
                "Target rate is not positive, returning default fee"
            );
            let event = FeeEvent::DegenerateTarget {
                at_ms: now_ms,
                target_rate: self.target_rate,
            };
            return (self.schedule.default, Some(event));
        };

        self.current_fee = plan.new_fee;
        if self.fee_history.len() >= self.config.smoothing_window_secs as usize {
            self.fee_history.pop_front();
        }
        self.fee_history.push_back(plan.new_fee);
        self.adjusted_at_ms = Some(now_ms);

        debug!(
            rate = plan.rate,
            target_rate = plan.target_rate,
            utilization = plan.utilization,
            multiplier = plan.multiplier,
            regime = ?plan.regime,
            previous_fee = plan.previous_fee,
            new_fee = plan.new_fee,
            "Fee adjusted"
        );

        let event = FeeEvent::Adjusted {
            at_ms: now_ms,
            previous_fee: self.price(plan.previous_fee),
            new_fee: self.price(plan.new_fee),
            utilization: plan.utilization,
            regime: plan.regime,
        };
        (plan.new_fee, Some(event))
    }
}
