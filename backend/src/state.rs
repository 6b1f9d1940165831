//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: the HTTP client and badge catalog are built once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Injectable time**: the clock is part of state so tests can pin "today"

use anyhow::{Context, Result};
use fitness_social_shared::{BadgeCatalog, Clock, SystemClock};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::services::{RequestSupersession, StatsClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Source of "today" for period resolution
    pub clock: Arc<dyn Clock>,
    /// Upstream statistics client
    pub stats: StatsClient,
    /// In-flight statistics requests per client
    pub inflight: RequestSupersession,
    /// Badge translation tables
    pub badges: Arc<BadgeCatalog>,
    /// Prometheus exposition handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state using the system clock.
    ///
    /// Loads the badge catalog from `badges.catalog_path` when configured.
    pub fn new(config: AppConfig) -> Result<Self> {
        let badges = match &config.badges.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read badge catalog {}", path))?;
                let catalog = BadgeCatalog::from_json(&json)
                    .with_context(|| format!("Invalid badge catalog {}", path))?;
                info!(path = %path, locales = catalog.locales().count(), "Loaded badge catalog");
                catalog
            }
            None => BadgeCatalog::new(),
        };

        Ok(Self {
            stats: StatsClient::new(&config),
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
            inflight: RequestSupersession::new(),
            badges: Arc::new(badges),
            metrics: None,
        })
    }

    /// Replace the clock (tests pin "today" with `FixedClock`)
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_badges(mut self, catalog: BadgeCatalog) -> Self {
        self.badges = Arc::new(catalog);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    #[inline]
    pub fn stats(&self) -> &StatsClient {
        &self.stats
    }

    #[inline]
    pub fn badges(&self) -> &BadgeCatalog {
        &self.badges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fitness_social_shared::FixedClock;

    #[test]
    fn test_state_clone_is_cheap() {
        let state = AppState::new(AppConfig::default()).unwrap();
        // Clone should be O(1) - just Arc increments
        let _cloned = state.clone();
        assert!(state.badges().is_empty());
    }

    #[test]
    fn test_clock_can_be_pinned() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let state = AppState::new(AppConfig::default())
            .unwrap()
            .with_clock(FixedClock(today));
        assert_eq!(state.clock().today(), today);
    }

    #[test]
    fn test_missing_catalog_file_is_an_error() {
        let mut config = AppConfig::default();
        config.badges.catalog_path = Some("/nonexistent/badges.json".to_string());
        assert!(AppState::new(config).is_err());
    }
}
