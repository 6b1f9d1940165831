//! API request and response types

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::badges::Badge;
use crate::errors::RangeError;
use crate::period::{normalize_range, range_for_period, Clock, DateRange, Period, RangeSelection};
use crate::units::{CanonicalUnit, UnitDimension};

/// Query for normalizing a single unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeUnitQuery {
    #[serde(default)]
    pub unit: Option<String>,
}

/// Normalized unit response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedUnitResponse {
    pub input: Option<String>,
    pub unit: String,
    /// False when the unit passed through unrecognized
    pub canonical: bool,
}

/// One entry of the canonical unit vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitVocabularyEntry {
    pub unit: CanonicalUnit,
    pub dimension: UnitDimension,
    pub aliases: Vec<String>,
}

impl From<CanonicalUnit> for UnitVocabularyEntry {
    fn from(unit: CanonicalUnit) -> Self {
        Self {
            unit,
            dimension: unit.dimension(),
            aliases: unit.aliases().iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Furthest a dashboard may page back, in periods
pub const MAX_PERIOD_OFFSET: u32 = 1200;

/// Query parameters for period resolution.
/// `from`/`to` are raw `YYYY-MM-DD` strings so bad input can be reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RangeQuery {
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    #[validate(range(max = MAX_PERIOD_OFFSET))]
    pub offset: u32,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl RangeQuery {
    /// The picker range from `from`/`to`, ordered; `None` unless both are set
    pub fn custom_range(&self) -> Result<Option<DateRange>, RangeError> {
        let selection = RangeSelection::parse(self.from.as_deref(), self.to.as_deref())?;
        Ok(normalize_range(Some(selection)))
    }

    /// Resolve the query into a concrete window against `clock`
    pub fn resolve(&self, clock: &dyn Clock) -> Result<RangeResponse, RangeError> {
        let range = range_for_period(&self.period, self.custom_range()?, self.offset, clock);
        Ok(RangeResponse {
            period: self.period.clone(),
            offset: self.offset,
            range,
        })
    }
}

/// Resolved analytics window; `range` is null for unbounded periods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeResponse {
    pub period: Period,
    pub offset: u32,
    pub range: Option<DateRange>,
}

/// Badge label request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeLabelRequest {
    pub badge: Badge,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Badge label response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeLabelResponse {
    pub key: String,
    pub locale: String,
    pub label: String,
}
