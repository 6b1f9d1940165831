//! Fitness Social Backend
//!
//! Serves exercise unit normalization, analytics period resolution and
//! badge labels to the web frontend, and forwards resolved analytics
//! windows to the statistics service.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: Upstream statistics client and request supersession
//! - Shared crate: the pure unit/period/badge logic

use anyhow::Result;
use fitness_social_backend::{config, routes, state::AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        stats_url = %config.stats_url(),
        "Starting Fitness Social Backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let mut state = AppState::new(config.clone())?;

    // Metrics are optional - the API keeps serving without a recorder
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Failed to install metrics recorder: {}. /metrics disabled.", e),
    }

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "fitness_social_backend=info,tower_http=info".into()
        } else {
            "fitness_social_backend=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    let base_url = &config.stats.base_url;
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push("Statistics base URL must start with http:// or https://");
    }

    if config.stats.timeout_secs == 0 {
        errors.push("Statistics timeout must be greater than zero");
    }

    if base_url.contains("localhost") || base_url.contains("127.0.0.1") {
        warn!("Statistics URL contains localhost - ensure this is intentional for production");
    }

    if config.badges.catalog_path.is_none() {
        warn!("No badge catalog configured - badge labels fall back to humanized keys");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
