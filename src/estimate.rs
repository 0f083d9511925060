//! # Tide Estimate & Classification
//!
//! Assembles the caller-facing [`TideEstimate`] from the composed constituents
//! and classifies the day with one of the five traditional tide types.
//!
//! ## Amplitude Ratio
//! The spring–neap envelope of the semidiurnal pair depends on the lunar
//! elongation θ (lagged by the tidal age):
//!
//! ```text
//! A(c, θ) = sqrt(M2² + S2² + 2·M2·S2·cos 2θ) + K1 + O1
//! ratio   = A(final, θ_now) / A(base, cos 2θ = 0)
//! ```
//!
//! The denominator is the base envelope halfway between spring and neap, so a
//! ratio of 1 is an average day at the reference point.
//!
//! ## Thresholds
//! | ratio          | type |
//! |----------------|------|
//! | < 0.84         | 長潮 |
//! | [0.84, 0.90)   | 若潮 |
//! | [0.90, 0.98)   | 小潮 |
//! | [0.98, 1.10)   | 中潮 |
//! | ≥ 1.10         | 大潮 |
//!
//! The table is monotonic in the ratio and the bands do not overlap.

use crate::config::CurveConfig;
use crate::curve;
use crate::error::TideError;
use crate::harmonic::HarmonicConstituents;
use crate::lunar::{self, MoonPhase};
use crate::{TideCurve, TideEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Traditional Japanese tide classification, ordered from smallest to largest
/// range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TideType {
    /// 長潮: the flattest tide, just after neap
    #[serde(rename = "長潮")]
    Long,
    /// 若潮: range starting to recover
    #[serde(rename = "若潮")]
    Young,
    /// 小潮: neap tide
    #[serde(rename = "小潮")]
    Neap,
    /// 中潮: intermediate
    #[serde(rename = "中潮")]
    Medium,
    /// 大潮: spring tide
    #[serde(rename = "大潮")]
    Spring,
}

/// Lower ratio bound of each type above [`TideType::Long`], ascending.
pub const TIDE_TYPE_THRESHOLDS: [(f64, TideType); 4] = [
    (0.84, TideType::Young),
    (0.90, TideType::Neap),
    (0.98, TideType::Medium),
    (1.10, TideType::Spring),
];

impl TideType {
    pub fn classify(amplitude_ratio: f64) -> TideType {
        TIDE_TYPE_THRESHOLDS
            .iter()
            .rev()
            .find(|(lower, _)| amplitude_ratio >= *lower)
            .map(|&(_, kind)| kind)
            .unwrap_or(TideType::Long)
    }

    pub fn label(self) -> &'static str {
        match self {
            TideType::Long => "長潮",
            TideType::Young => "若潮",
            TideType::Neap => "小潮",
            TideType::Medium => "中潮",
            TideType::Spring => "大潮",
        }
    }
}

impl std::fmt::Display for TideType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Envelope of M2+S2 for a given `cos 2θ`, plus the main diurnal pair.
fn envelope(c: &HarmonicConstituents, cos_two_theta: f64) -> f64 {
    let semidiurnal = (c.m2 * c.m2 + c.s2 * c.s2 + 2.0 * c.m2 * c.s2 * cos_two_theta)
        .max(0.0)
        .sqrt();
    semidiurnal + c.k1 + c.o1
}

/// Current composed amplitude over the mean base amplitude.
pub fn amplitude_ratio(final_constituents: &HarmonicConstituents, at: DateTime<Utc>) -> f64 {
    let theta = lunar::tidal_phase_angle(at);
    let current = envelope(final_constituents, (2.0 * theta).cos());
    let base = envelope(&HarmonicConstituents::BASE, 0.0);
    current / base
}

/// Estimated tidal state at a query instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TideEstimate {
    pub tide_type: TideType,
    pub current_height: f64,
    pub next_high_tide: Option<TideEvent>,
    pub next_low_tide: Option<TideEvent>,
    pub tide_range: f64,
    pub moon_phase: MoonPhase,
    /// Input to the tide type classification
    pub amplitude_ratio: f64,
    pub query_time: DateTime<Utc>,
    /// Wall-clock time the estimate was produced
    pub calculated_at: DateTime<Utc>,
    pub curve: TideCurve,
}

impl TideEstimate {
    /// Build the estimate for `query` from final constituents.
    pub fn assemble(
        final_constituents: &HarmonicConstituents,
        query: DateTime<Utc>,
        config: &CurveConfig,
    ) -> Result<Self, TideError> {
        let outlook = curve::outlook(final_constituents, query, config)?;
        let current_height = final_constituents.height(query);
        let ratio = amplitude_ratio(final_constituents, query);
        if !ratio.is_finite() {
            return Err(TideError::NonFinite("amplitude ratio"));
        }

        Ok(TideEstimate {
            tide_type: TideType::classify(ratio),
            current_height,
            next_high_tide: Some(outlook.next_high),
            next_low_tide: Some(outlook.next_low),
            tide_range: outlook.curve.range(),
            moon_phase: lunar::moon_phase(query),
            amplitude_ratio: ratio,
            query_time: query,
            calculated_at: Utc::now(),
            curve: outlook.curve,
        })
    }

    /// Defined estimate for when the calculation could not complete: no
    /// events, zero range, 中潮.
    pub fn degraded(query: DateTime<Utc>) -> Self {
        TideEstimate {
            tide_type: TideType::Medium,
            current_height: 0.0,
            next_high_tide: None,
            next_low_tide: None,
            tide_range: 0.0,
            moon_phase: lunar::moon_phase(query),
            amplitude_ratio: 1.0,
            query_time: query,
            calculated_at: Utc::now(),
            curve: TideCurve {
                start: query,
                step_minutes: 0,
                samples: Vec::new(),
                events: Vec::new(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.next_high_tide.is_none() || self.next_low_tide.is_none()
    }

    /// How this estimate differs from an earlier one.
    pub fn compare(&self, prior: &TideEstimate) -> EstimateDelta {
        let tolerance_ms = self.curve.step_minutes.max(1) * 60_000;
        let shifted = |a: Option<TideEvent>, b: Option<TideEvent>| match (a, b) {
            (Some(a), Some(b)) => (a.time - b.time).num_milliseconds().abs() > tolerance_ms,
            (None, None) => false,
            _ => true,
        };

        EstimateDelta {
            height_change: self.current_height - prior.current_height,
            range_change: self.tide_range - prior.tide_range,
            tide_type_changed: self.tide_type != prior.tide_type,
            next_high_shifted: shifted(self.next_high_tide, prior.next_high_tide),
            next_low_shifted: shifted(self.next_low_tide, prior.next_low_tide),
        }
    }
}

/// Differences between two estimates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateDelta {
    pub height_change: f64,
    pub range_change: f64,
    pub tide_type_changed: bool,
    /// Next high moved by more than one sample step
    pub next_high_shifted: bool,
    pub next_low_shifted: bool,
}
