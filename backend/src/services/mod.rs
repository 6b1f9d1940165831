//! Business logic services
//!
//! Services encapsulate the outbound statistics calls and request
//! bookkeeping that sit around the shared analytics logic.

pub mod inflight;
pub mod stats;

pub use inflight::{LoadError, RequestSupersession};
pub use stats::{StatsClient, StatsError};
