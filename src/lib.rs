//! # Tide Estimator Core Library
//!
//! Deterministic tide estimation for a personal fishing log. Given a position
//! and a timestamp the engine estimates the current tide height, the next high
//! and low water, the tidal range, the traditional Japanese tide type
//! (大潮 / 中潮 / 小潮 / 長潮 / 若潮) and the moon phase. A diagnostics layer
//! explains each estimate, scores its quality and caches the result.
//!
//! The model is an explainable approximation, not an oceanographic one: seven
//! fixed harmonic constituents, scaled by a geographic and a seasonal
//! correction.
//!
//! ## Data Flow
//! 1. **Normalize**: coordinate validated, date parsed once ([`input`])
//! 2. **Correct**: coordinate and seasonal factors ([`variation`])
//! 3. **Compose**: base constituents × factors ([`composer`])
//! 4. **Sample**: 10-minute curve, high/low extraction ([`curve`])
//! 5. **Classify**: amplitude ratio + moon phase → tide type ([`estimate`], [`lunar`])
//! 6. **Diagnose**: integrity, accuracy score, warnings, cache ([`diagnostics`])
//!
//! ## Core Types
//! - [`Sample`]: one curve point relative to the query time
//! - [`TideEvent`]: a high or low water instant
//! - [`TideCurve`]: the sampled window with its extracted events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod composer;
pub mod config;
pub mod curve;
pub mod diagnostics;
pub mod error;
pub mod estimate;
pub mod harmonic;
pub mod input;
pub mod logging;
pub mod lunar;
pub mod renderer;
pub mod variation;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use diagnostics::{DebugReport, TideEngine};
pub use error::TideError;
pub use estimate::{TideEstimate, TideType};
pub use input::{Coordinate, DateInput, DiagnosticRecord};

/// A single curve point at a time relative to the query instant.
///
/// # Example
/// ```
/// use tide_estimator_lib::Sample;
///
/// // Height at the query time
/// let now = Sample { mins_rel: 0, height: 0.42 };
///
/// // Height two hours later
/// let later = Sample { mins_rel: 120, height: -0.8 };
/// assert!(later.mins_rel > now.mins_rel);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Minutes after the query time
    pub mins_rel: i32,
    /// Height in model units
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TideKind {
    High,
    Low,
}

/// High or low water extracted from the curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    pub time: DateTime<Utc>,
    pub height: f64,
    pub kind: TideKind,
}

/// Sampled tide heights over a window starting at the query time, with the
/// events found in it.
///
/// `samples` are evenly spaced and ascending; `events` are ascending by time.
///
/// # Example
/// ```
/// use tide_estimator_lib::{Sample, TideCurve};
///
/// let curve = TideCurve {
///     start: chrono::Utc::now(),
///     step_minutes: 10,
///     samples: vec![
///         Sample { mins_rel: 0, height: 0.1 },
///         Sample { mins_rel: 10, height: 0.4 },
///         Sample { mins_rel: 20, height: 0.2 },
///     ],
///     events: vec![],
/// };
///
/// assert!((curve.range() - 0.3).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideCurve {
    /// Query instant, `mins_rel == 0`
    pub start: DateTime<Utc>,
    pub step_minutes: i64,
    pub samples: Vec<Sample>,
    pub events: Vec<TideEvent>,
}

impl TideCurve {
    /// Lowest and highest sampled height, `None` for an empty curve.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        Some(
            self.samples
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), s| {
                    (min.min(s.height), max.max(s.height))
                }),
        )
    }

    /// `max − min` over the window; zero when empty.
    pub fn range(&self) -> f64 {
        self.bounds().map(|(min, max)| max - min).unwrap_or(0.0)
    }

    /// First event of `kind` strictly after `after`.
    pub fn next_event(&self, kind: TideKind, after: DateTime<Utc>) -> Option<TideEvent> {
        self.events
            .iter()
            .find(|e| e.kind == kind && e.time > after)
            .copied()
    }
}
