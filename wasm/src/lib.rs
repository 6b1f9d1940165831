//! Fitness Social WASM Module
//!
//! This crate exposes the unit normalizer and period resolver to the
//! browser so filters and dashboards use the same rules as the backend.
//! Structured values cross the boundary as JSON strings.

use fitness_social_shared::period::parse_query_date;
use fitness_social_shared::{
    normalize_range as normalize_selection, range_for_period as resolve_period, DateRange, Period,
    RangeSelection, SystemClock,
};
use wasm_bindgen::prelude::*;

/// Normalize a free-text unit to its canonical token
#[wasm_bindgen]
pub fn normalize_unit(input: Option<String>) -> String {
    fitness_social_shared::normalize_unit(input.as_deref())
}

/// Distinct normalized units from a JSON list of unit options.
/// Returns a JSON array; malformed JSON yields `[]`.
#[wasm_bindgen]
pub fn extract_normalized_units(options_json: &str) -> String {
    let options = serde_json::from_str(options_json).unwrap_or(serde_json::Value::Null);
    let units = fitness_social_shared::extract_normalized_units(&options);
    serde_json::to_string(&units).unwrap_or_else(|_| "[]".to_string())
}

/// Resolve a period into a `{"from","to"}` JSON window, or `undefined`.
///
/// For `custom`, `from`/`to` form the range; unparseable or missing
/// endpoints leave it unset.
#[wasm_bindgen]
pub fn range_for_period(
    period: &str,
    from: Option<String>,
    to: Option<String>,
    offset: u32,
) -> Option<String> {
    let custom = selection(from, to).and_then(|s| normalize_selection(Some(s)));
    let range = resolve_period(&Period::from(period), custom, offset, &SystemClock)?;
    to_json(&range)
}

/// Order two `YYYY-MM-DD` endpoints; `undefined` unless both parse
#[wasm_bindgen]
pub fn normalize_range(from: Option<String>, to: Option<String>) -> Option<String> {
    let range = normalize_selection(selection(from, to))?;
    to_json(&range)
}

fn selection(from: Option<String>, to: Option<String>) -> Option<RangeSelection> {
    Some(RangeSelection {
        from: from.as_deref().and_then(|d| parse_query_date(d).ok()),
        to: to.as_deref().and_then(|d| parse_query_date(d).ok()),
    })
}

fn to_json(range: &DateRange) -> Option<String> {
    serde_json::to_string(range).ok()
}
