//! Configuration management for the Fitness Social backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: FS__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub stats: StatsConfig,
    #[serde(default)]
    pub badges: BadgesConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Upstream statistics endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    pub base_url: String,
    pub path: String,
    pub health_path: String,
    pub timeout_secs: u64,
}

/// Badge label configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgesConfig {
    pub default_locale: String,
    /// JSON translation catalog: `{ "<locale>": { "<badge key>": "<label>" } }`
    #[serde(default)]
    pub catalog_path: Option<String>,
}

impl Default for BadgesConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            catalog_path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            stats: StatsConfig {
                base_url: "http://localhost:3000".to_string(),
                path: "/api/stats".to_string(),
                health_path: "/health".to_string(),
                timeout_secs: 15,
            },
            badges: BadgesConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with FS__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., FS__STATS__BASE_URL=https://api.example.com sets stats.base_url
            .add_source(config::Environment::with_prefix("FS").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Full URL of the upstream statistics endpoint
    pub fn stats_url(&self) -> String {
        join_url(&self.stats.base_url, &self.stats.path)
    }

    /// Full URL of the upstream health endpoint
    pub fn stats_health_url(&self) -> String {
        join_url(&self.stats.base_url, &self.stats.health_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.stats.timeout_secs, 15);
        assert_eq!(config.badges.default_locale, "en");
        assert!(config.badges.catalog_path.is_none());
    }

    #[test]
    fn test_stats_url_joins_slashes() {
        let mut config = AppConfig::default();
        config.stats.base_url = "https://stats.example.com/".to_string();
        config.stats.path = "/v2/summary".to_string();
        assert_eq!(config.stats_url(), "https://stats.example.com/v2/summary");
        assert_eq!(config.stats_health_url(), "https://stats.example.com/health");
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
