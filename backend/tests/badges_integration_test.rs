//! Integration tests for badge label resolution

mod common;

use axum::http::StatusCode;
use fitness_social_shared::BadgeCatalog;
use serde_json::{json, Value};

fn catalog() -> BadgeCatalog {
    let mut catalog = BadgeCatalog::new();
    catalog.insert("en", "streak_30", "30-Day Streak");
    catalog.insert("de", "streak_30", "30-Tage-Serie");
    catalog
}

#[tokio::test]
async fn test_label_uses_catalog_language_fallback() {
    let app = common::TestApp::with_badges(catalog());
    let body = json!({"badge": {"key": "streak_30"}, "locale": "de-AT"});

    let (status, body) = app.post("/api/v1/badges/label", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json,
        json!({"key": "streak_30", "locale": "de-AT", "label": "30-Tage-Serie"})
    );
}

#[tokio::test]
async fn test_label_defaults_to_configured_locale() {
    let app = common::TestApp::with_badges(catalog());
    let body = json!({"badge": {"key": "streak_30"}});

    let (_, body) = app.post("/api/v1/badges/label", &body.to_string()).await;

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["locale"], "en");
    assert_eq!(json["label"], "30-Day Streak");
}

#[tokio::test]
async fn test_label_humanizes_unknown_key() {
    let app = common::TestApp::new();
    let body = json!({"badge": {"key": "early_bird"}, "locale": "fr"});

    let (_, body) = app.post("/api/v1/badges/label", &body.to_string()).await;

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["label"], "Early Bird");
}

#[tokio::test]
async fn test_label_rejects_blank_key() {
    let app = common::TestApp::new();
    let body = json!({"badge": {"key": "  "}});

    let (status, body) = app.post("/api/v1/badges/label", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("VALIDATION_ERROR"));
}
