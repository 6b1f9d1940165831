//! Analytics period API routes

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use fitness_social_shared::types::{RangeQuery, RangeResponse};
use fitness_social_shared::{DateRange, Period};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header identifying a dashboard instance; newer requests with the same
/// value supersede older in-flight ones
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Statistics for a resolved window
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub period: Period,
    pub offset: u32,
    pub range: Option<DateRange>,
    pub data: Value,
}

/// Create analytics routes
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/range", get(resolve_range))
        .route("/stats", get(get_stats))
}

/// GET /api/v1/analytics/range - Resolve a period into a date window
async fn resolve_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<RangeResponse>> {
    query.validate()?;
    Ok(Json(query.resolve(state.clock())?))
}

/// GET /api/v1/analytics/stats - Fetch upstream statistics for a period
async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<StatsResponse>> {
    query.validate()?;
    let resolved = query.resolve(state.clock())?;

    let client_id = headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    info!(
        period = %resolved.period,
        offset = resolved.offset,
        range = ?resolved.range,
        client = client_id.as_deref().unwrap_or("-"),
        "Loading statistics"
    );

    let stats = state.stats().clone();
    let range = resolved.range;
    let fetch = async move { stats.fetch(range.as_ref()).await };

    let data = match client_id {
        Some(id) => state.inflight.run(&id, fetch).await??,
        None => fetch.await?,
    };

    Ok(Json(StatsResponse {
        period: resolved.period,
        offset: resolved.offset,
        range: resolved.range,
        data,
    }))
}
