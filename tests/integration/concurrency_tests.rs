//! Concurrency integration tests
//!
//! Controllers are shared across tasks and threads; every request must be
//! counted and routes must not affect each other.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, FeeAssertions, T0, micros};
    use std::sync::Arc;
    use surge_pricing::{FeeConfigPatch, FeeEvent, FeeRegistry, Price, PricingConfig};

    // ==================== Shared Controller ====================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_quotes_all_counted() {
        let config = ConfigFactory::default_config();
        let controller = Arc::new(ConfigFactory::controller(config.clone()));

        let handles: Vec<_> = (0..16i64)
            .map(|task| {
                let controller = controller.clone();
                tokio::spawn(async move {
                    let mut fees = Vec::with_capacity(250);
                    for request in 0..250i64 {
                        let offset = (task * 250 + request) % 1_000;
                        fees.push(controller.quote(T0 + offset));
                        if request % 50 == 0 {
                            tokio::task::yield_now().await;
                        }
                    }
                    fees
                })
            })
            .collect();

        let mut fees = Vec::new();
        for handle in handles {
            fees.extend(handle.await.unwrap());
        }

        let metrics = controller.metrics(T0 + 999);
        assert_eq!(metrics.request_count, 4_000);
        assert_eq!(metrics.active_seconds, 1);
        fees.assert_within(&config);
    }

    #[test]
    fn test_quotes_and_metrics_across_threads() {
        let controller = ConfigFactory::controller(ConfigFactory::default_config());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let controller = &controller;
                scope.spawn(move || {
                    for second in 0..5i64 {
                        for _ in 0..50 {
                            controller.quote(T0 + second * 1_000);
                        }
                    }
                });
            }
            scope.spawn(|| {
                for second in 0..5i64 {
                    let metrics = controller.metrics(T0 + second * 1_000);
                    assert!(metrics.fee_history_len <= 30);
                }
            });
        });

        let metrics = controller.metrics(T0 + 4_999);
        assert_eq!(metrics.request_count, 1_000);
        assert_eq!(metrics.active_seconds, 5);
        assert!(micros(&controller.current_fee()) > 1_000);
    }

    // ==================== Registry ====================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_routes_do_not_interfere() {
        let mut config = PricingConfig::default();
        for route in ["/hot", "/warm", "/cold"] {
            config.set_route(route, FeeConfigPatch::default());
        }
        let registry = FeeRegistry::from_config(&config, T0).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    for second in 0..5i64 {
                        for _ in 0..40 {
                            registry.quote("/hot", T0 + second * 1_000).unwrap();
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = registry.snapshot(T0 + 4_999);
        assert_eq!(snapshot["/hot"].request_count, 1_600);
        assert!(micros(&snapshot["/hot"].current_fee) > 1_000);
        for route in ["/warm", "/cold"] {
            assert_eq!(snapshot[route].request_count, 0);
            assert_eq!(snapshot[route].current_fee, Price::text("$0.0010"));
        }
    }

    // ==================== Events ====================

    #[tokio::test]
    async fn test_adjustment_events_reach_subscriber() {
        let controller = Arc::new(ConfigFactory::controller(ConfigFactory::default_config()));
        let mut events = controller.subscribe();

        let listener = tokio::spawn(async move {
            let mut adjusted = 0;
            while let Ok(event) = events.recv().await {
                match event {
                    FeeEvent::Adjusted { .. } => adjusted += 1,
                    FeeEvent::Reset { .. } => break,
                    _ => {}
                }
            }
            adjusted
        });

        for step in 1..=10 {
            controller.force_adjustment(T0 + step * 1_000);
        }
        controller.reset();

        assert_eq!(listener.await.unwrap(), 10);
    }
}
