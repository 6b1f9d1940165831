//! Error types for the Fitness Social analytics core
//!
//! The string-level operations (unit normalization, period resolution)
//! never fail. These errors only surface from the typed APIs used at
//! request boundaries.

use thiserror::Error;

use crate::units::{CanonicalUnit, UnitDimension};

/// Errors from the typed unit API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Unrecognized unit: {0}")]
    Unrecognized(String),

    #[error("Cannot convert {from} ({from_dimension}) to {to} ({to_dimension})")]
    IncompatibleDimensions {
        from: CanonicalUnit,
        from_dimension: UnitDimension,
        to: CanonicalUnit,
        to_dimension: UnitDimension,
    },
}

/// Errors from parsing date range input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
