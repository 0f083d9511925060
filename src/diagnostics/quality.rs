//! Integrity check, accuracy score and warnings.

use crate::harmonic::{Constituent, HarmonicConstituents};
use crate::variation::{CoordinateVariationFactors, SeasonalVariationFactors};
use crate::DiagnosticRecord;

/// Constituents weighed by the accuracy score.
const SCORED: [Constituent; 4] = [
    Constituent::M2,
    Constituent::S2,
    Constituent::K1,
    Constituent::O1,
];

/// `(deviation upper bound, score)`, ascending; anything above the last
/// bound scores [`FLOOR_SCORE`].
const ACCURACY_BANDS: [(f64, f64); 4] = [(0.10, 0.95), (0.15, 0.90), (0.20, 0.85), (0.30, 0.75)];
const FLOOR_SCORE: f64 = 0.60;

pub const FAR_FROM_REFERENCE_KM: f64 = 500.0;
pub const SIGNIFICANT_MONTHLY_CORRECTION: f64 = 0.08;

/// False when the record is missing an id, a coordinate or a parsable date,
/// or when its coordinate is out of range.
pub fn check_integrity(record: &DiagnosticRecord, date_ok: bool) -> bool {
    let coordinate_ok = record.coordinates.as_ref().is_some_and(|c| c.is_valid());
    record.has_id() && coordinate_ok && date_ok
}

/// Mean relative deviation of the scored constituents.
pub fn mean_deviation(base: &HarmonicConstituents, final_: &HarmonicConstituents) -> f64 {
    let total: f64 = SCORED
        .iter()
        .map(|&c| {
            let b = base.amplitude(c);
            if b == 0.0 {
                0.0
            } else {
                ((final_.amplitude(c) - b) / b).abs()
            }
        })
        .sum();
    total / SCORED.len() as f64
}

/// Map a mean deviation to a score. Non-increasing in `deviation`.
pub fn score_deviation(deviation: f64) -> f64 {
    ACCURACY_BANDS
        .iter()
        .find(|(bound, _)| deviation < *bound)
        .map(|&(_, score)| score)
        .unwrap_or(FLOOR_SCORE)
}

pub fn calculate_accuracy_score(base: &HarmonicConstituents, final_: &HarmonicConstituents) -> f64 {
    score_deviation(mean_deviation(base, final_))
}

pub fn generate_warnings(
    coordinate: &CoordinateVariationFactors,
    seasonal: &SeasonalVariationFactors,
    integrity: bool,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if coordinate.distance_from_reference > FAR_FROM_REFERENCE_KM {
        warnings.push(format!(
            "far from reference point ({:.0} km): geographic correction is less reliable",
            coordinate.distance_from_reference
        ));
    }
    if seasonal.monthly_correction.abs() > SIGNIFICANT_MONTHLY_CORRECTION {
        warnings.push(format!(
            "significant seasonal variation (monthly correction {:+.3})",
            seasonal.monthly_correction
        ));
    }
    if !integrity {
        warnings.push("data integrity issues: missing or invalid id, coordinates or date".into());
    }

    warnings
}
