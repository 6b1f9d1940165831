//! Badge API routes

use axum::{extract::State, routing::post, Json, Router};
use fitness_social_shared::resolve_badge_label;
use fitness_social_shared::types::{BadgeLabelRequest, BadgeLabelResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Create badge routes
pub fn badge_routes() -> Router<AppState> {
    Router::new().route("/label", post(resolve_label))
}

/// POST /api/v1/badges/label - Resolve a badge's display label
async fn resolve_label(
    State(state): State<AppState>,
    Json(req): Json<BadgeLabelRequest>,
) -> ApiResult<Json<BadgeLabelResponse>> {
    if req.badge.key.trim().is_empty() {
        return Err(ApiError::Validation("Badge key cannot be empty".to_string()));
    }

    let locale = req
        .locale
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| state.config().badges.default_locale.clone());

    let label = resolve_badge_label(&req.badge, &locale, state.badges());

    Ok(Json(BadgeLabelResponse {
        key: req.badge.key,
        locale,
        label,
    }))
}
