//! Route pricing configuration
//!
//! One document describes every protected route: shared `defaults` layered
//! over the built-in defaults, then each route's own overrides on top.

use super::fee::{FeeConfigPatch, FeeControllerConfig, create_config};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pricing configuration for a set of protected routes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Overrides shared by every route
    #[serde(default)]
    pub defaults: FeeConfigPatch,
    /// Per-route overrides, keyed by route name
    #[serde(default)]
    pub routes: BTreeMap<String, FeeConfigPatch>,
}

impl PricingConfig {
    /// Effective configuration for `route`, if it is configured
    pub fn route_config(&self, route: &str) -> Option<FeeControllerConfig> {
        self.routes
            .get(route)
            .map(|patch| self.resolve_patch(patch.clone()))
    }

    /// Effective configuration of every route, in route-name order
    pub fn route_configs(&self) -> impl Iterator<Item = (&str, FeeControllerConfig)> + '_ {
        self.routes
            .iter()
            .map(|(route, patch)| (route.as_str(), self.resolve_patch(patch.clone())))
    }

    /// Add or replace a route
    pub fn set_route<S: Into<String>>(&mut self, route: S, patch: FeeConfigPatch) {
        self.routes.insert(route.into(), patch);
    }

    fn resolve_patch(&self, patch: FeeConfigPatch) -> FeeControllerConfig {
        create_config(self.defaults.clone().overlay(patch))
    }
}
