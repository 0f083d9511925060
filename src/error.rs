//! # Error Taxonomy
//!
//! Every failure the engine can encounter internally. None of these escape the
//! public [`TideEngine`](crate::diagnostics::TideEngine) operations: invalid
//! inputs degrade the calculation and are reported as quality flags, internal
//! faults are converted into fallback results at the diagnostics boundary.

use thiserror::Error;

/// Errors raised by the calculators and the input normalization layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TideError {
    /// Latitude or longitude outside the valid range (or not finite).
    #[error("invalid coordinate: latitude={latitude}, longitude={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// A date string that none of the accepted formats could parse.
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    /// Arithmetic produced NaN or infinity.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    /// The composed curve had no high or low water within the search horizon.
    #[error("no tide extremum found within {hours} hours")]
    NoExtremum { hours: i64 },
}
