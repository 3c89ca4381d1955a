//! Test fixtures and data factories
//!
//! Factories build real controllers and configurations, not mocks.

use surge_pricing::{FeeConfigPatch, FeeController, FeeControllerConfig, Price, create_config};

/// Factory for controller configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Built-in defaults
    pub fn default_config() -> FeeControllerConfig {
        FeeControllerConfig::default()
    }

    /// Wide bounds and a short interval, reacting within one burst
    pub fn fast_reacting() -> FeeControllerConfig {
        create_config(FeeConfigPatch {
            min_base_fee: Some(Price::text("$0.0001")),
            max_base_fee: Some(Price::text("$0.01")),
            default_base_fee: Some(Price::text("$0.001")),
            max_change_rate: Some(0.5),
            target_utilization: Some(0.5),
            adjustment_interval_ms: Some(50),
            ..Default::default()
        })
    }

    /// Premium route starting at half a cent
    pub fn premium() -> FeeControllerConfig {
        create_config(FeeConfigPatch {
            default_base_fee: Some(Price::text("$0.005")),
            target_utilization: Some(0.8),
            ..Default::default()
        })
    }

    /// Controller whose fee can never move
    pub fn pinned() -> FeeControllerConfig {
        create_config(FeeConfigPatch {
            max_change_rate: Some(0.0),
            ..Default::default()
        })
    }

    /// Build a controller started at `start_ms`
    pub fn controller_at(config: FeeControllerConfig, start_ms: i64) -> FeeController {
        FeeController::new(config, start_ms).expect("fixture config is valid")
    }

    pub fn controller(config: FeeControllerConfig) -> FeeController {
        Self::controller_at(config, super::T0)
    }
}

/// Load pattern replayed against a controller in simulated seconds
#[derive(Debug, Clone)]
pub struct Traffic {
    /// Requests per second, one entry per simulated second
    pub seconds: Vec<u32>,
}

impl Traffic {
    pub fn steady(rps: u32, secs: usize) -> Self {
        Self {
            seconds: vec![rps; secs],
        }
    }

    pub fn idle(secs: usize) -> Self {
        Self::steady(0, secs)
    }

    /// Append another pattern
    pub fn then(mut self, other: Traffic) -> Self {
        self.seconds.extend(other.seconds);
        self
    }

    /// Quote every request, spreading each second's requests evenly, and
    /// return the fee observed at the end of each second
    pub fn replay(&self, controller: &FeeController, start_ms: i64) -> Vec<Price> {
        self.seconds
            .iter()
            .enumerate()
            .map(|(second, &rps)| {
                let second_start = start_ms + second as i64 * 1_000;
                for request in 0..rps {
                    let offset = i64::from(request) * 1_000 / i64::from(rps);
                    controller.quote(second_start + offset);
                }
                controller.current_fee()
            })
            .collect()
    }

    /// End of the replayed period
    pub fn end(&self, start_ms: i64) -> i64 {
        start_ms + self.seconds.len() as i64 * 1_000
    }
}
