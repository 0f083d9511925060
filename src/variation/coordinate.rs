//! Geographic variation relative to the reference point.
//!
//! Distance uses a planar degrees-to-kilometres approximation
//! (1° ≈ 111 km on both axes). Good enough for a correction that saturates
//! at 20 % beyond 200 km.

use crate::config::ReferencePoint;
use crate::input::Coordinate;
use serde::{Deserialize, Serialize};

/// Kilometres per degree in the planar approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

const LATITUDE_EFFECT_PER_DEGREE: f64 = 0.01;
const LONGITUDE_EFFECT_PER_DEGREE: f64 = 0.005;
const CORRECTION_PER_KM: f64 = 0.001;

/// Upper bound of the geographic correction.
pub const MAX_GEOGRAPHIC_CORRECTION: f64 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateVariationFactors {
    pub latitude_effect: f64,
    pub longitude_effect: f64,
    /// Kilometres, never negative
    pub distance_from_reference: f64,
    /// In [0, 0.2]
    pub geographic_correction: f64,
}

impl CoordinateVariationFactors {
    /// No geographic correction at all.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// Factors for `coordinate` against `reference`.
///
/// An absent coordinate yields [`CoordinateVariationFactors::zero`]; that is
/// an expected degraded mode, not an error. Callers are responsible for
/// validating the coordinate first.
pub fn coordinate_factors(
    coordinate: Option<&Coordinate>,
    reference: &ReferencePoint,
) -> CoordinateVariationFactors {
    let Some(coordinate) = coordinate else {
        return CoordinateVariationFactors::zero();
    };

    let lat_diff = coordinate.latitude - reference.latitude;
    let lng_diff = coordinate.longitude - reference.longitude;
    let distance = lat_diff.hypot(lng_diff) * KM_PER_DEGREE;

    CoordinateVariationFactors {
        latitude_effect: lat_diff * LATITUDE_EFFECT_PER_DEGREE,
        longitude_effect: lng_diff * LONGITUDE_EFFECT_PER_DEGREE,
        distance_from_reference: distance,
        geographic_correction: (distance * CORRECTION_PER_KM).min(MAX_GEOGRAPHIC_CORRECTION),
    }
}
