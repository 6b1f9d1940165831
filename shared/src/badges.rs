//! Badge label resolution
//!
//! Challenge and leaderboard badges carry a stable key (`first_workout`)
//! plus optional per-locale labels. Labels resolve through a fixed
//! fallback chain so a badge always has something to display.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locale used when neither the requested locale nor its language matches
pub const FALLBACK_LOCALE: &str = "en";

/// A badge as delivered by the API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Badge {
    pub key: String,
    /// Explicit label set by the challenge author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Labels embedded in the badge itself, keyed by locale
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// Translation tables: locale -> badge key -> label
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeCatalog {
    locales: BTreeMap<String, BTreeMap<String, String>>,
}

impl BadgeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a translation
    pub fn insert(&mut self, locale: &str, key: &str, label: &str) {
        self.locales
            .entry(canonical_locale(locale))
            .or_default()
            .insert(key.to_string(), label.to_string());
    }

    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales
            .get(&canonical_locale(locale))
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .filter(|label| !label.trim().is_empty())
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Load a catalog from its JSON form, canonicalizing locale keys
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for (locale, table) in raw {
            for (key, label) in table {
                catalog.insert(&locale, &key, &label);
            }
        }
        Ok(catalog)
    }
}

/// Lowercase locale with `-` separators (`de_AT` -> `de-at`)
fn canonical_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_lowercase()
}

/// Language part of a locale (`de-at` -> `de`)
fn base_language(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

/// Candidate locales in lookup order, without duplicates
fn locale_chain(locale: &str) -> Vec<String> {
    let exact = canonical_locale(locale);
    let mut chain = Vec::with_capacity(3);
    for candidate in [
        exact.clone(),
        base_language(&exact).to_string(),
        FALLBACK_LOCALE.to_string(),
    ] {
        if !candidate.is_empty() && !chain.contains(&candidate) {
            chain.push(candidate);
        }
    }
    chain
}

/// `first_workout` -> `First Workout`
pub fn humanize_key(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve the display label for a badge.
///
/// Lookup order: the badge's own labels (exact locale, then language),
/// the catalog (exact locale, language, then English), the badge's
/// explicit `label`, and finally the humanized key. Blank labels are
/// skipped.
pub fn resolve_badge_label(badge: &Badge, locale: &str, catalog: &BadgeCatalog) -> String {
    let chain = locale_chain(locale);
    let exact = canonical_locale(locale);

    let embedded = badge
        .labels
        .iter()
        .map(|(loc, label)| (canonical_locale(loc), label))
        .filter(|(_, label)| !label.trim().is_empty())
        .collect::<BTreeMap<_, _>>();

    let own = [exact.clone(), base_language(&exact).to_string()]
        .into_iter()
        .find_map(|loc| embedded.get(&loc).map(|label| label.trim().to_string()));
    if let Some(label) = own {
        return label;
    }

    if let Some(label) = chain.iter().find_map(|loc| catalog.get(loc, &badge.key)) {
        return label.trim().to_string();
    }

    match badge.label.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => humanize_key(&badge.key),
    }
}
