//! Exercise unit API routes

use axum::{
    extract::Query,
    routing::{get, post},
    Json, Router,
};
use fitness_social_shared::types::{
    NormalizeUnitQuery, NormalizedUnitResponse, UnitVocabularyEntry,
};
use fitness_social_shared::units::{extract_normalized_units, is_canonical, normalize_unit};
use fitness_social_shared::CanonicalUnit;
use serde_json::Value;
use tracing::debug;

use crate::state::AppState;

/// Create unit routes
pub fn unit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_vocabulary))
        .route("/normalize", get(normalize))
        .route("/extract", post(extract))
}

/// GET /api/v1/units - Canonical vocabulary with aliases
async fn get_vocabulary() -> Json<Vec<UnitVocabularyEntry>> {
    Json(
        CanonicalUnit::ALL
            .into_iter()
            .map(UnitVocabularyEntry::from)
            .collect(),
    )
}

/// GET /api/v1/units/normalize?unit=... - Normalize a single unit
async fn normalize(Query(query): Query<NormalizeUnitQuery>) -> Json<NormalizedUnitResponse> {
    let unit = normalize_unit(query.unit.as_deref());
    let canonical = is_canonical(&unit);

    if !canonical && !unit.is_empty() {
        metrics::counter!("units_unrecognized_total").increment(1);
        debug!(unit = %unit, "Unrecognized unit passed through");
    }

    Json(NormalizedUnitResponse {
        input: query.unit,
        unit,
        canonical,
    })
}

/// POST /api/v1/units/extract - Distinct normalized units from catalog options
async fn extract(Json(options): Json<Value>) -> Json<Vec<String>> {
    let units = extract_normalized_units(&options);
    debug!(count = units.len(), "Extracted normalized units");
    Json(units)
}
