//! Per-route fee controller registry
//!
//! Each protected route gets its own [`FeeController`]. Lookups go through a
//! sharded map, so quoting one route never waits on another.

use crate::config::{FeeControllerConfig, PricingConfig};
use crate::core::fee_controller::{FeeController, FeeMetrics};
use crate::core::price::Price;
use crate::utils::error::{PricingError, Result};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Registry of fee controllers keyed by route
#[derive(Debug, Clone, Default)]
pub struct FeeRegistry {
    controllers: Arc<DashMap<String, Arc<FeeController>>>,
}

impl FeeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one controller per route of a pricing file
    pub fn from_config(config: &PricingConfig, now_ms: i64) -> Result<Self> {
        config.check()?;

        let registry = Self::new();
        for (route, route_config) in config.route_configs() {
            registry.register(route, route_config, now_ms)?;
        }

        info!(routes = registry.len(), "Fee registry initialized");
        Ok(registry)
    }

    /// Create a controller for `route`, replacing any existing one
    pub fn register<S: Into<String>>(
        &self,
        route: S,
        config: FeeControllerConfig,
        now_ms: i64,
    ) -> Result<Arc<FeeController>> {
        let route = route.into();
        let controller = Arc::new(FeeController::new(config, now_ms)?);

        info!(route = %route, "Registered fee controller");
        self.controllers.insert(route, controller.clone());
        Ok(controller)
    }

    pub fn get(&self, route: &str) -> Option<Arc<FeeController>> {
        self.controllers.get(route).map(|entry| entry.value().clone())
    }

    /// Quote the fee for one request on `route`
    pub fn quote(&self, route: &str, now_ms: i64) -> Result<Price> {
        Ok(self.controller(route)?.quote(now_ms))
    }

    pub fn metrics(&self, route: &str, now_ms: i64) -> Result<FeeMetrics> {
        Ok(self.controller(route)?.metrics(now_ms))
    }

    pub fn remove(&self, route: &str) -> Option<Arc<FeeController>> {
        self.controllers.remove(route).map(|(_, controller)| controller)
    }

    /// Registered routes in name order
    pub fn routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = self
            .controllers
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        routes.sort();
        routes
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Metrics of every route
    pub fn snapshot(&self, now_ms: i64) -> BTreeMap<String, FeeMetrics> {
        self.entries()
            .into_iter()
            .map(|(route, controller)| (route, controller.metrics(now_ms)))
            .collect()
    }

    /// Reset every controller to its default fee
    pub fn reset_all(&self) {
        for (_, controller) in self.entries() {
            controller.reset();
        }
    }

    fn controller(&self, route: &str) -> Result<Arc<FeeController>> {
        self.get(route)
            .ok_or_else(|| PricingError::route_not_found(route))
    }

    /// Clone the entries out so no shard lock is held while a controller runs
    fn entries(&self) -> Vec<(String, Arc<FeeController>)> {
        self.controllers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
