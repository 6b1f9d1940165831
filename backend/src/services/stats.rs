//! Upstream statistics client
//!
//! Forwards a resolved analytics window to the statistics endpoint as
//! `from`/`to` query parameters in `YYYY-MM-DD` form.

use fitness_social_shared::DateRange;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

/// Failures talking to the statistics endpoint
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Statistics request failed: {0}")]
    Transport(String),

    #[error("Statistics endpoint returned status {0}")]
    Status(u16),

    #[error("Statistics response could not be parsed: {0}")]
    Parse(String),
}

/// HTTP client for the statistics endpoint
#[derive(Clone)]
pub struct StatsClient {
    client: Client,
    stats_url: String,
    health_url: String,
}

impl StatsClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.stats.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            stats_url: config.stats_url(),
            health_url: config.stats_health_url(),
        }
    }

    /// Fetch statistics for `range`; no range means no date bounds
    pub async fn fetch(&self, range: Option<&DateRange>) -> Result<Value, StatsError> {
        let mut request = self.client.get(&self.stats_url);
        if let Some(range) = range {
            request = request.query(&range.query_params()[..]);
        }
        debug!(url = %self.stats_url, range = ?range, "Fetching statistics");

        let response = request
            .send()
            .await
            .map_err(|e| StatsError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| StatsError::Transport(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| StatsError::Parse(e.to_string()))
    }

    /// Check that the statistics endpoint is reachable
    pub async fn ping(&self) -> Result<(), StatsError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| StatsError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StatsError::Status(response.status().as_u16()))
        }
    }
}
