//! # Tide Curve & Event Extraction
//!
//! Samples the composed harmonic curve on a fixed grid starting at the query
//! time and extracts high and low water from sign changes of the discrete
//! derivative.
//!
//! ## Sampling
//! - **Window**: 24 hours by default, configurable
//! - **Resolution**: 10 minutes by default, so 145 samples per day
//! - **Origin**: the sample with `mins_rel == 0` is the query instant
//!
//! ## Event Refinement
//! A grid extremum is only accurate to one step. Each one is refined with a
//! three-point parabola through its neighbours; the vertex offset is bounded
//! to half a step, so a refined event never moves onto or before the query
//! time. The height at the refined instant is re-evaluated from the model.
//!
//! ## Window Extension
//! If the window holds no high (or no low) after the query time, the search is
//! repeated with a doubled window, up to `max_window_retries` times.

use crate::config::{CurveConfig, MAX_WINDOW_HOURS, MAX_WINDOW_RETRIES};
use crate::error::TideError;
use crate::harmonic::{hours_since_epoch, HarmonicConstituents};
use crate::{Sample, TideCurve, TideEvent, TideKind};
use chrono::{DateTime, Duration, Utc};

/// Longest window any search may sample; keeps minute offsets within `i32`.
const MAX_SAMPLED_HOURS: i64 = MAX_WINDOW_HOURS << MAX_WINDOW_RETRIES;

/// Sample `constituents` from `start` over `window_hours`, capped at
/// [`MAX_SAMPLED_HOURS`].
pub fn sample_curve(
    constituents: &HarmonicConstituents,
    start: DateTime<Utc>,
    window_hours: i64,
    step_minutes: i64,
) -> Result<TideCurve, TideError> {
    let step = step_minutes.max(1);
    let steps = (window_hours.clamp(0, MAX_SAMPLED_HOURS) * 60) / step;
    let origin = hours_since_epoch(start);

    let mut samples = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        let mins_rel = i * step;
        let height = constituents.height_at_hours(origin + mins_rel as f64 / 60.0);
        if !height.is_finite() {
            return Err(TideError::NonFinite("tide curve"));
        }
        samples.push(Sample {
            mins_rel: mins_rel as i32,
            height,
        });
    }

    let events = extract_events(constituents, start, step, &samples);

    Ok(TideCurve {
        start,
        step_minutes: step,
        samples,
        events,
    })
}

/// Local extrema of `samples`, refined and in time order.
///
/// A high is a rise followed by a fall or flat step; a low is the mirror case.
/// Requiring a strict change on the leading side keeps a flat top from being
/// reported twice.
fn extract_events(
    constituents: &HarmonicConstituents,
    start: DateTime<Utc>,
    step_minutes: i64,
    samples: &[Sample],
) -> Vec<TideEvent> {
    let mut events = Vec::new();
    for w in samples.windows(3) {
        let rise = w[1].height - w[0].height;
        let next = w[2].height - w[1].height;

        let kind = if rise > 0.0 && next <= 0.0 {
            TideKind::High
        } else if rise < 0.0 && next >= 0.0 {
            TideKind::Low
        } else {
            continue;
        };

        let offset = vertex_offset(w[0].height, w[1].height, w[2].height);
        let mins = w[1].mins_rel as f64 + offset * step_minutes as f64;
        let time = start + Duration::milliseconds((mins * 60_000.0).round() as i64);

        events.push(TideEvent {
            time,
            height: constituents.height(time),
            kind,
        });
    }
    events
}

/// Vertex of the parabola through three equally spaced points, in steps
/// relative to the middle one, bounded to ±0.5.
fn vertex_offset(y0: f64, y1: f64, y2: f64) -> f64 {
    let denom = y0 - 2.0 * y1 + y2;
    if denom == 0.0 {
        return 0.0;
    }
    (0.5 * (y0 - y2) / denom).clamp(-0.5, 0.5)
}

/// The initial curve plus the next high and low water after `query`.
#[derive(Clone, Debug)]
pub struct TideOutlook {
    /// Curve over the configured window (not the extended one)
    pub curve: TideCurve,
    pub next_high: TideEvent,
    pub next_low: TideEvent,
    /// Window that finally contained both events
    pub searched_hours: i64,
}

/// Sample the configured window and find the next high and low, doubling the
/// window when either is missing.
pub fn outlook(
    constituents: &HarmonicConstituents,
    query: DateTime<Utc>,
    config: &CurveConfig,
) -> Result<TideOutlook, TideError> {
    let initial = sample_curve(constituents, query, config.window_hours, config.step_minutes)?;

    let mut window = config.window_hours;
    let mut attempt = 0;
    loop {
        let extended;
        let curve = if attempt == 0 {
            &initial
        } else {
            extended = sample_curve(constituents, query, window, config.step_minutes)?;
            &extended
        };

        let high = curve.next_event(TideKind::High, query);
        let low = curve.next_event(TideKind::Low, query);
        if let (Some(next_high), Some(next_low)) = (high, low) {
            if attempt > 0 {
                tracing::debug!(window_hours = window, attempt, "extended tide search window");
            }
            return Ok(TideOutlook {
                curve: initial,
                next_high,
                next_low,
                searched_hours: window,
            });
        }

        if attempt >= config.max_window_retries.min(MAX_WINDOW_RETRIES) {
            return Err(TideError::NoExtremum { hours: window });
        }
        attempt += 1;
        window = window.saturating_mul(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 24, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_default_window_has_145_samples() {
        let curve = sample_curve(&HarmonicConstituents::base(), query(), 24, 10).unwrap();
        assert_eq!(curve.samples.len(), 145);
        assert_eq!(curve.samples[0].mins_rel, 0);
        assert_eq!(curve.samples[144].mins_rel, 1440);
        for w in curve.samples.windows(2) {
            assert_eq!(w[1].mins_rel - w[0].mins_rel, 10);
        }
    }

    #[test]
    fn test_events_alternate_and_are_ordered() {
        let curve = sample_curve(&HarmonicConstituents::base(), query(), 48, 10).unwrap();
        assert!(curve.events.len() >= 4, "found {} events", curve.events.len());
        for w in curve.events.windows(2) {
            assert!(w[0].time < w[1].time);
            assert_ne!(w[0].kind, w[1].kind, "high and low must alternate");
        }
    }

    #[test]
    fn test_highs_are_above_neighbouring_lows() {
        let curve = sample_curve(&HarmonicConstituents::base(), query(), 48, 10).unwrap();
        for w in curve.events.windows(2) {
            let (high, low) = match w[0].kind {
                TideKind::High => (w[0], w[1]),
                TideKind::Low => (w[1], w[0]),
            };
            assert!(high.height > low.height);
        }
    }

    #[test]
    fn test_refined_event_beats_grid_sample() {
        let base = HarmonicConstituents::base();
        let curve = sample_curve(&base, query(), 24, 10).unwrap();
        let high = curve.next_event(TideKind::High, query()).unwrap();
        let grid_max = curve
            .samples
            .iter()
            .filter(|s| {
                let t = query() + Duration::minutes(s.mins_rel as i64);
                (t - high.time).num_minutes().abs() <= 10
            })
            .map(|s| s.height)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(high.height >= grid_max - 1e-3);
    }

    #[test]
    fn test_single_sine_extrema() {
        // M2 alone: highs every 12.42 h.
        let m2_only = HarmonicConstituents {
            m2: 1.0,
            ..HarmonicConstituents::ZERO
        };
        let curve = sample_curve(&m2_only, query(), 48, 10).unwrap();
        let highs: Vec<_> = curve
            .events
            .iter()
            .filter(|e| e.kind == TideKind::High)
            .collect();
        assert!(highs.len() >= 3);
        let gap = (highs[1].time - highs[0].time).num_minutes();
        assert!((gap - 745).abs() <= 2, "gap was {gap} minutes");
        assert!(highs.iter().all(|e| (e.height - 1.0).abs() < 1e-4));
    }

    #[test]
    fn test_vertex_offset_bounds() {
        assert_eq!(vertex_offset(1.0, 2.0, 1.0), 0.0);
        assert!(vertex_offset(0.0, 1.0, 0.999).abs() <= 0.5);
        assert_eq!(vertex_offset(1.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_outlook_finds_events_after_query() {
        let out = outlook(&HarmonicConstituents::base(), query(), &CurveConfig::default()).unwrap();
        assert!(out.next_high.time > query());
        assert!(out.next_low.time > query());
        assert_eq!(out.searched_hours, 24);
        assert_eq!(out.curve.samples.len(), 145);
    }

    #[test]
    fn test_outlook_extends_short_window() {
        // A 2-hour window rarely holds both a high and a low; doubling must
        // eventually cover a full semidiurnal cycle.
        let config = CurveConfig {
            window_hours: 2,
            step_minutes: 10,
            max_window_retries: 4,
        };
        let out = outlook(&HarmonicConstituents::base(), query(), &config).unwrap();
        assert!(out.searched_hours >= 2 && out.searched_hours <= 32);
        assert_eq!(out.curve.samples.len(), 13);
    }

    #[test]
    fn test_flat_curve_fails_after_retries() {
        let config = CurveConfig {
            window_hours: 6,
            step_minutes: 10,
            max_window_retries: 2,
        };
        let err = outlook(&HarmonicConstituents::ZERO, query(), &config).unwrap_err();
        assert_eq!(err, TideError::NoExtremum { hours: 24 });
    }

    #[test]
    fn test_oversized_window_is_capped() {
        let curve = sample_curve(&HarmonicConstituents::base(), query(), i64::MAX / 2, 60).unwrap();
        let last = curve.samples.last().unwrap();
        assert_eq!(last.mins_rel as i64, MAX_SAMPLED_HOURS * 60);
    }

    #[test]
    fn test_retries_are_bounded() {
        let config = CurveConfig {
            window_hours: 6,
            step_minutes: 10,
            max_window_retries: u32::MAX,
        };
        let err = outlook(&HarmonicConstituents::ZERO, query(), &config).unwrap_err();
        assert_eq!(
            err,
            TideError::NoExtremum {
                hours: 6 << MAX_WINDOW_RETRIES
            }
        );
    }
}
