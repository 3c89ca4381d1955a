//! Pricing scenario integration tests
//!
//! End-to-end behavior of a single controller under simulated traffic.

#[cfg(test)]
mod tests {
    use crate::common::assertions::assert_histories_bounded;
    use crate::common::{ConfigFactory, FeeAssertions, T0, Traffic, micros};
    use surge_pricing::{FeeConfigPatch, Price, create_config};

    // ==================== Documented Scenarios ====================

    /// Eight quotes in the same millisecond measure as 8 requests per second
    #[test]
    fn test_burst_measured_against_target() {
        let controller = ConfigFactory::controller(create_config(FeeConfigPatch {
            target_utilization: Some(0.5),
            ..Default::default()
        }));

        for _ in 0..8 {
            controller.quote(T0);
        }
        let metrics = controller.metrics(T0);

        assert_eq!(metrics.current_rps, 8.0);
        assert_eq!(metrics.target_rps, 10.0);
        assert_eq!(metrics.active_seconds, 1);
        assert_eq!(metrics.utilization, "80.0%");
    }

    /// A burst followed by more traffic after the interval raises the fee
    #[test]
    fn test_burst_then_follow_up_raises_fee() {
        let controller = ConfigFactory::controller(ConfigFactory::fast_reacting());

        for _ in 0..12 {
            controller.quote(T0);
        }
        let mut fee = controller.current_fee();
        for _ in 0..3 {
            fee = controller.quote(T0 + 60);
        }

        assert!(micros(&fee) > 1_000, "fee {} did not rise", fee);
    }

    /// Light traffic and a forced adjustment lower the fee
    #[test]
    fn test_low_traffic_lowers_fee() {
        let controller = ConfigFactory::controller(ConfigFactory::premium());

        for offset in [0, 100, 200] {
            controller.quote(T0 + offset);
        }
        let fee = controller.force_adjustment(T0 + 200);

        assert!(micros(&fee) < 5_000, "fee {} did not drop", fee);
    }

    /// With a zero change rate the fee never leaves the default
    #[test]
    fn test_zero_change_rate_pins_fee() {
        let controller = ConfigFactory::controller(ConfigFactory::pinned());
        let traffic = Traffic::steady(500, 5)
            .then(Traffic::idle(5))
            .then(Traffic::steady(50, 5));

        let fees = traffic.replay(&controller, T0);

        assert!(fees.iter().all(|fee| *fee == Price::text("$0.0010")));
        assert_eq!(
            controller.force_adjustment(traffic.end(T0)),
            Price::text("$0.0010")
        );
    }

    /// Unset fields of an overridden config keep the documented defaults
    #[test]
    fn test_create_config_keeps_documented_defaults() {
        let config = create_config(FeeConfigPatch {
            default_base_fee: Some(Price::text("$0.002")),
            ..Default::default()
        });

        assert_eq!(config.default_base_fee, Price::text("$0.002"));
        assert_eq!(config.min_base_fee, Price::text("$0.001"));
        assert_eq!(config.max_base_fee, Price::text("$0.1"));
        assert_eq!(config.max_change_rate, 0.125);
        assert_eq!(config.target_utilization, 0.5);
        assert_eq!(config.smoothing_window_secs, 30);
        assert_eq!(config.elasticity_multiplier, 2.0);
        assert_eq!(config.adjustment_interval_ms, 1_000);
        assert_eq!(config.assumed_peak_capacity, 20.0);
    }

    // ==================== Controller Properties ====================

    #[test]
    fn test_sustained_congestion_raises_fee_monotonically() {
        let controller = ConfigFactory::controller(ConfigFactory::default_config());

        let fees = Traffic::steady(40, 15).replay(&controller, T0);

        fees.assert_non_decreasing();
        assert!(micros(&fees[fees.len() - 1]) > 1_000);
    }

    #[test]
    fn test_sustained_idle_lowers_fee_monotonically() {
        let controller = ConfigFactory::controller(create_config(FeeConfigPatch {
            default_base_fee: Some(Price::text("$0.1")),
            ..Default::default()
        }));

        let fees = Traffic::steady(1, 20).replay(&controller, T0);

        fees.assert_non_increasing();
        assert!(micros(&fees[fees.len() - 1]) < 100_000);
    }

    #[test]
    fn test_fee_never_leaves_bounds() {
        let config = create_config(FeeConfigPatch {
            max_change_rate: Some(1.0),
            elasticity_multiplier: Some(5.0),
            adjustment_interval_ms: Some(100),
            ..Default::default()
        });
        let controller = ConfigFactory::controller(config.clone());
        let traffic = Traffic::steady(1_000, 10)
            .then(Traffic::idle(10))
            .then(Traffic::steady(3, 10));

        let fees = traffic.replay(&controller, T0);

        fees.assert_within(&config);
    }

    #[test]
    fn test_quotes_between_adjustments_share_fee() {
        let controller = ConfigFactory::controller(ConfigFactory::default_config());
        let traffic = Traffic::steady(40, 3);
        traffic.replay(&controller, T0);

        let end = traffic.end(T0);
        let first = controller.quote(end);
        for offset in (1..1_000).step_by(111) {
            assert_eq!(controller.quote(end + offset), first);
        }
    }

    #[test]
    fn test_histories_stay_within_window() {
        let controller = ConfigFactory::controller(create_config(FeeConfigPatch {
            smoothing_window_secs: Some(5),
            ..Default::default()
        }));

        for second in 0..40i64 {
            let start = T0 + second * 1_000;
            let rps = ((second * 13) % 29) as u32;
            Traffic::steady(rps, 1).replay(&controller, start);
            controller.force_adjustment(start + 999);
            assert_histories_bounded(&controller, start + 999);
        }
    }

    #[test]
    fn test_reset_restores_defaults() {
        let controller = ConfigFactory::controller(ConfigFactory::default_config());
        let traffic = Traffic::steady(60, 8);
        let fees = traffic.replay(&controller, T0);
        assert!(micros(&fees[fees.len() - 1]) > 1_000);

        controller.reset();
        let metrics = controller.metrics(traffic.end(T0));

        assert_eq!(controller.current_fee(), Price::text("$0.0010"));
        assert_eq!(metrics.current_rps, 0.0);
        assert_eq!(metrics.request_count, 0);
    }

    /// A quiet second reports the mean of earlier samples, not zero
    #[test]
    fn test_quiet_second_falls_back_to_history_mean() {
        let controller = ConfigFactory::controller(ConfigFactory::default_config());
        for _ in 0..8 {
            controller.quote(T0);
        }

        // Samples 1, 3, 5 and 7 were kept while the burst arrived
        let metrics = controller.metrics(T0 + 1_500);
        assert_eq!(metrics.current_rps, 4.0);
        assert_eq!(metrics.utilization, "40.0%");
        assert_eq!(metrics.request_count, 8);
    }

    #[test]
    fn test_numeric_prices_quote_as_numbers() {
        let controller = ConfigFactory::controller(create_config(FeeConfigPatch {
            min_base_fee: Some(Price::Amount(0.001)),
            max_base_fee: Some(Price::Amount(0.01)),
            default_base_fee: Some(Price::Amount(0.004)),
            ..Default::default()
        }));

        let fees = Traffic::steady(2, 3).replay(&controller, T0);

        assert!(fees.iter().all(|fee| matches!(fee, Price::Amount(_))));
        assert_eq!(fees[0], Price::Amount(0.004));
        assert!(micros(&fees[2]) < 4_000);
    }
}
