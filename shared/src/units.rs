//! Exercise unit normalization
//!
//! The exercise catalog is crowd-edited in several languages, so the same
//! measurement shows up as "Sekunden", "seconds" or "s". This module maps
//! those aliases onto a small canonical vocabulary so units can be
//! de-duplicated, filtered and compared.
//!
//! # Design Principles
//!
//! 1. **Total functions**: string normalization never fails. Unknown units
//!    pass through verbatim (trimmed) so custom units stay visible.
//! 2. **Tables as data**: every alias lives in exactly one static bucket,
//!    which the tests check mechanically.
//! 3. **Typed core, string edges**: `CanonicalUnit` is the typed view, the
//!    string API mirrors what the UI filters consume.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::errors::UnitError;

// ============================================================================
// Canonical Units
// ============================================================================

/// Canonical exercise measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalUnit {
    Reps,
    Sec,
    Min,
    Km,
    M,
    Miles,
}

/// Physical dimension of a canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitDimension {
    /// Repetition counts
    Count,
    /// Time, base unit seconds
    Duration,
    /// Length, base unit meters
    Distance,
}

impl fmt::Display for UnitDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitDimension::Count => "count",
            UnitDimension::Duration => "duration",
            UnitDimension::Distance => "distance",
        };
        f.write_str(name)
    }
}

const REPS_ALIASES: &[&str] = &[
    "reps",
    "rep",
    "wdh",
    "wdhs",
    "wiederholung",
    "wiederholungen",
];

const SEC_ALIASES: &[&str] = &[
    "sec", "secs", "second", "seconds", "sek", "sekunde", "sekunden", "s",
];

// "minute(n)" is kept literally as it appears in the catalog data.
const MIN_ALIASES: &[&str] = &["min", "mins", "minute", "minutes", "minute(n)", "minuten"];

const MILES_ALIASES: &[&str] = &["miles", "mile", "mi", "meile", "meilen"];

const KM_ALIASES: &[&str] = &["km", "kilometer", "kilometers", "kilometre", "kilometres"];

const M_ALIASES: &[&str] = &["m", "meter", "meters", "metre", "metres"];

/// Alias buckets in evaluation order. Keys are lowercase.
pub const UNIT_ALIASES: &[(CanonicalUnit, &[&str])] = &[
    (CanonicalUnit::Reps, REPS_ALIASES),
    (CanonicalUnit::Sec, SEC_ALIASES),
    (CanonicalUnit::Min, MIN_ALIASES),
    (CanonicalUnit::Miles, MILES_ALIASES),
    (CanonicalUnit::Km, KM_ALIASES),
    (CanonicalUnit::M, M_ALIASES),
];

/// Flattened alias index. Earlier buckets win if an alias were ever repeated.
static ALIAS_INDEX: Lazy<HashMap<&'static str, CanonicalUnit>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (unit, aliases) in UNIT_ALIASES {
        for alias in *aliases {
            index.entry(*alias).or_insert(*unit);
        }
    }
    index
});

impl CanonicalUnit {
    /// All canonical units in evaluation order
    pub const ALL: [CanonicalUnit; 6] = [
        CanonicalUnit::Reps,
        CanonicalUnit::Sec,
        CanonicalUnit::Min,
        CanonicalUnit::Miles,
        CanonicalUnit::Km,
        CanonicalUnit::M,
    ];

    /// Look up an alias, ignoring case and surrounding whitespace
    pub fn lookup(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase();
        ALIAS_INDEX.get(key.as_str()).copied()
    }

    /// Canonical token used in filters and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalUnit::Reps => "reps",
            CanonicalUnit::Sec => "sec",
            CanonicalUnit::Min => "min",
            CanonicalUnit::Km => "km",
            CanonicalUnit::M => "m",
            CanonicalUnit::Miles => "miles",
        }
    }

    /// Every alias that normalizes to this unit
    pub fn aliases(&self) -> &'static [&'static str] {
        UNIT_ALIASES
            .iter()
            .find(|(unit, _)| unit == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }

    pub fn dimension(&self) -> UnitDimension {
        match self {
            CanonicalUnit::Reps => UnitDimension::Count,
            CanonicalUnit::Sec | CanonicalUnit::Min => UnitDimension::Duration,
            CanonicalUnit::Km | CanonicalUnit::M | CanonicalUnit::Miles => UnitDimension::Distance,
        }
    }

    /// Convert a value in this unit to the dimension's base unit
    /// (repetitions, seconds or meters)
    pub fn to_base(&self, value: f64) -> f64 {
        match self {
            CanonicalUnit::Reps | CanonicalUnit::Sec | CanonicalUnit::M => value,
            CanonicalUnit::Min => value * 60.0,
            CanonicalUnit::Km => value * 1000.0,
            CanonicalUnit::Miles => value * 1609.344,
        }
    }

    /// Convert a value in the dimension's base unit to this unit
    pub fn from_base(&self, base: f64) -> f64 {
        match self {
            CanonicalUnit::Reps | CanonicalUnit::Sec | CanonicalUnit::M => base,
            CanonicalUnit::Min => base / 60.0,
            CanonicalUnit::Km => base / 1000.0,
            CanonicalUnit::Miles => base / 1609.344,
        }
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CanonicalUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalUnit::lookup(s).ok_or_else(|| UnitError::Unrecognized(s.trim().to_string()))
    }
}

/// Convert a value between two units of the same dimension
pub fn convert(value: f64, from: CanonicalUnit, to: CanonicalUnit) -> Result<f64, UnitError> {
    if from.dimension() != to.dimension() {
        return Err(UnitError::IncompatibleDimensions {
            from,
            from_dimension: from.dimension(),
            to,
            to_dimension: to.dimension(),
        });
    }
    Ok(to.from_base(from.to_base(value)))
}

// ============================================================================
// String Normalization
// ============================================================================

/// Normalize a free-text unit to its canonical token.
///
/// Blank or missing input yields an empty string. Unrecognized input is
/// returned trimmed with its original casing.
pub fn normalize_unit(input: Option<&str>) -> String {
    let trimmed = match input.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };

    match CanonicalUnit::lookup(trimmed) {
        Some(unit) => unit.as_str().to_string(),
        None => trimmed.to_string(),
    }
}

/// Whether a unit string maps onto the canonical vocabulary
pub fn is_canonical(input: &str) -> bool {
    CanonicalUnit::lookup(input).is_some()
}

// ============================================================================
// Unit Options
// ============================================================================

/// A unit entry from the exercise catalog: a bare string, or a
/// localized `value`/`label` pair where either side may be missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitOption {
    Text(String),
    Labeled {
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        label: Option<String>,
    },
}

impl UnitOption {
    /// Normalize the option, preferring `value` and falling back to `label`
    pub fn normalized(&self) -> String {
        match self {
            UnitOption::Text(text) => normalize_unit(Some(text.as_str())),
            UnitOption::Labeled { value, label } => {
                let from_value = normalize_unit(value.as_deref());
                if from_value.is_empty() {
                    normalize_unit(label.as_deref())
                } else {
                    from_value
                }
            }
        }
    }
}

impl From<&str> for UnitOption {
    fn from(text: &str) -> Self {
        UnitOption::Text(text.to_string())
    }
}

/// Extract the de-duplicated normalized units from typed options
pub fn extract_units_from_options(options: &[UnitOption]) -> Vec<String> {
    dedup_units(options.iter().map(UnitOption::normalized))
}

/// Extract the de-duplicated normalized units from loosely shaped JSON.
///
/// Anything other than an array yields an empty list. Object fields that
/// are not strings are treated as absent. Order of first occurrence is kept.
pub fn extract_normalized_units(options: &Value) -> Vec<String> {
    let Some(items) = options.as_array() else {
        return Vec::new();
    };

    dedup_units(items.iter().map(|item| match item {
        Value::String(text) => normalize_unit(Some(text.as_str())),
        other => {
            let from_value = normalize_unit(string_field(other, "value"));
            if from_value.is_empty() {
                normalize_unit(string_field(other, "label"))
            } else {
                from_value
            }
        }
    }))
}

fn string_field<'a>(item: &'a Value, name: &str) -> Option<&'a str> {
    item.get(name).and_then(Value::as_str)
}

fn dedup_units(units: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    units
        .into_iter()
        .filter(|unit| !unit.is_empty() && seen.insert(unit.clone()))
        .collect()
}
