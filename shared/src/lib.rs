//! Fitness Social Shared Library
//!
//! This crate contains the pure analytics logic shared by the backend and
//! WASM modules: exercise unit normalization, analytics period resolution
//! and badge label lookup.

pub mod badges;
pub mod errors;
pub mod period;
pub mod types;
pub mod units;

// Re-export commonly used items
pub use badges::{resolve_badge_label, Badge, BadgeCatalog};
pub use errors::*;
pub use period::{
    normalize_range, range_for_period, Clock, DateRange, FixedClock, Period, RangeSelection,
    SystemClock,
};
pub use units::{
    extract_normalized_units, extract_units_from_options, normalize_unit, CanonicalUnit,
    UnitDimension, UnitOption,
};
