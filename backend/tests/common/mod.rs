//! Common test utilities for integration tests
//!
//! Builds the router with a pinned clock and an optional mock statistics
//! upstream, and drives it in-process.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use fitness_social_backend::{config::AppConfig, routes, state::AppState};
use fitness_social_shared::{BadgeCatalog, FixedClock};
use tower::ServiceExt;
use wiremock::MockServer;

/// "Today" for every integration test: Friday 2026-10-16
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    /// Application with no reachable statistics upstream
    pub fn new() -> Self {
        Self::build(test_config(), BadgeCatalog::new())
    }

    /// Application whose statistics upstream is `server`
    pub fn with_stats(server: &MockServer) -> Self {
        let mut config = test_config();
        config.stats.base_url = server.uri();
        Self::build(config, BadgeCatalog::new())
    }

    pub fn with_badges(catalog: BadgeCatalog) -> Self {
        Self::build(test_config(), catalog)
    }

    fn build(config: AppConfig, catalog: BadgeCatalog) -> Self {
        let state = AppState::new(config)
            .expect("Failed to build test state")
            .with_clock(FixedClock(today()))
            .with_badges(catalog);
        let app = routes::create_router(state);

        Self { app }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a GET request with an extra header
    pub async fn get_with_header(&self, path: &str, name: &str, value: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(name, value)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    // Nothing listens here; readiness and stats calls fail fast
    config.stats.base_url = "http://127.0.0.1:9".to_string();
    config.stats.timeout_secs = 2;
    config
}
