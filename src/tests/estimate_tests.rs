//! # Tide Estimate Properties
//!
//! Sweeps positions and dates through [`TideEngine::estimate_tide`] and checks
//! the guarantees callers rely on: a non-negative range and exactly one next
//! high and next low after the query time.

use crate::curve::sample_curve;
use crate::harmonic::HarmonicConstituents;
use crate::{Coordinate, TideEngine, TideKind, TideType};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn positions() -> Vec<Option<Coordinate>> {
    vec![
        None,
        Some(Coordinate::new(35.6762, 139.6503)), // Tokyo Bay
        Some(Coordinate::new(34.6937, 135.5023)), // Osaka Bay
        Some(Coordinate::new(43.0642, 141.3469)), // Sapporo
        Some(Coordinate::new(26.2124, 127.6809)), // Naha
        Some(Coordinate::new(-33.8688, 151.2093)),
        Some(Coordinate::new(90.0, -180.0)),
    ]
}

fn queries() -> Vec<DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 3, 17, 0).unwrap();
    (0..40)
        .map(|i| start + Duration::hours(i * 223))
        .collect()
}

/// Range is never negative and both next events lie after the query.
#[test]
fn estimates_have_range_and_next_events() {
    let engine = TideEngine::default();
    for position in positions() {
        for query in queries() {
            let estimate = engine.estimate_tide(position.as_ref(), query);

            assert!(estimate.tide_range >= 0.0);
            assert!(!estimate.is_degraded(), "{position:?} at {query}");

            let high = estimate.next_high_tide.unwrap();
            let low = estimate.next_low_tide.unwrap();
            assert_eq!(high.kind, TideKind::High);
            assert_eq!(low.kind, TideKind::Low);
            assert!(high.time > query);
            assert!(low.time > query);
        }
    }
}

/// The reported next events are the first of their kind in the curve.
#[test]
fn next_events_are_the_earliest() {
    let engine = TideEngine::default();
    let query = Utc.with_ymd_and_hms(2025, 7, 24, 6, 0, 0).unwrap();
    let estimate = engine.estimate_tide(None, query);

    let high = estimate.next_high_tide.unwrap();
    let earlier_highs = estimate
        .curve
        .events
        .iter()
        .filter(|e| e.kind == TideKind::High && e.time > query && e.time < high.time)
        .count();
    assert_eq!(earlier_highs, 0);
}

/// Identical inputs give identical results apart from the wall-clock stamp.
#[test]
fn estimates_are_deterministic() {
    let engine = TideEngine::default();
    let osaka = Coordinate::new(34.6937, 135.5023);
    let query = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();

    let a = engine.estimate_tide(Some(&osaka), query);
    let b = engine.estimate_tide(Some(&osaka), query);
    assert_eq!(a.curve, b.curve);
    assert_eq!(a.next_high_tide, b.next_high_tide);
    assert_eq!(a.tide_type, b.tide_type);
}

/// Over a synodic month every tide type shows up, springs near syzygy.
#[test]
fn tide_types_cycle_over_a_month() {
    let engine = TideEngine::default();
    let start = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let mut seen = std::collections::HashSet::new();
    for hour in (0..30 * 24).step_by(6) {
        let estimate = engine.estimate_tide(None, start + Duration::hours(hour));
        seen.insert(estimate.tide_type);
    }
    for kind in [
        TideType::Spring,
        TideType::Medium,
        TideType::Neap,
        TideType::Young,
        TideType::Long,
    ] {
        assert!(seen.contains(&kind), "{kind:?} never appeared");
    }
}

/// 大潮 days have a wider range than 長潮 days.
#[test]
fn spring_range_exceeds_neap_range() {
    let engine = TideEngine::default();
    let start = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let estimates: Vec<_> = (0..30)
        .map(|day| engine.estimate_tide(None, start + Duration::days(day)))
        .collect();

    let mean_range = |kind: TideType| {
        let ranges: Vec<f64> = estimates
            .iter()
            .filter(|e| e.tide_type == kind)
            .map(|e| e.tide_range)
            .collect();
        ranges.iter().sum::<f64>() / ranges.len().max(1) as f64
    };
    assert!(mean_range(TideType::Spring) > mean_range(TideType::Long));
}

/// Sampling is evenly spaced and starts at the query.
#[test]
fn samples_have_correct_10_minute_spacing() {
    let query = Utc.with_ymd_and_hms(2025, 7, 24, 0, 0, 0).unwrap();
    let curve = sample_curve(&HarmonicConstituents::base(), query, 24, 10).unwrap();

    assert_eq!(curve.samples.len(), 145);
    for window in curve.samples.windows(2) {
        assert_eq!(window[1].mins_rel - window[0].mins_rel, 10);
    }
    assert_eq!(curve.samples.iter().filter(|s| s.mins_rel == 0).count(), 1);
}

/// Ten-minute steps keep the curve smooth.
#[test]
fn curve_changes_gradually() {
    let query = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
    let curve = sample_curve(&HarmonicConstituents::base(), query, 24, 10).unwrap();
    let max_change = curve
        .samples
        .windows(2)
        .map(|w| (w[1].height - w[0].height).abs())
        .fold(0.0_f64, f64::max);
    // Steepest possible slope is Σ Aω ≈ 1.27 units/hour.
    assert!(max_change < 0.22, "max 10-minute change {max_change}");
}
