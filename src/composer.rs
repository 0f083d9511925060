//! Combines the base constituents with both correction factor sets.
//!
//! The split is deliberately asymmetric and must stay exactly like this for
//! results to be reproducible:
//!
//! | constituent | geographic `(1 + g)` | solar `s` |
//! |-------------|:-------------------:|:---------:|
//! | M2, S2      | ✓ | ✓ |
//! | N2, Q1      | ✓ |   |
//! | K1, O1, P1  |   | ✓ |

use crate::error::TideError;
use crate::harmonic::HarmonicConstituents;
use crate::variation::{CoordinateVariationFactors, SeasonalVariationFactors};

/// Final constituents for one request.
///
/// Fails with [`TideError::NonFinite`] if any input factor poisons the
/// result with NaN or infinity.
pub fn compose(
    base: &HarmonicConstituents,
    coordinate: &CoordinateVariationFactors,
    seasonal: &SeasonalVariationFactors,
) -> Result<HarmonicConstituents, TideError> {
    let geo = 1.0 + coordinate.geographic_correction;
    let solar = seasonal.solar_correction_factor;

    let composed = HarmonicConstituents {
        m2: base.m2 * geo * solar,
        s2: base.s2 * geo * solar,
        n2: base.n2 * geo,
        k1: base.k1 * solar,
        o1: base.o1 * solar,
        p1: base.p1 * solar,
        q1: base.q1 * geo,
    };

    if composed.is_finite() {
        Ok(composed)
    } else {
        Err(TideError::NonFinite("composed constituents"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(geo: f64, solar: f64) -> (CoordinateVariationFactors, SeasonalVariationFactors) {
        (
            CoordinateVariationFactors {
                geographic_correction: geo,
                ..CoordinateVariationFactors::zero()
            },
            SeasonalVariationFactors {
                solar_correction_factor: solar,
                ..SeasonalVariationFactors::neutral()
            },
        )
    }

    #[test]
    fn test_neutral_factors_keep_base() {
        let (c, s) = factors(0.0, 1.0);
        let base = HarmonicConstituents::base();
        assert_eq!(compose(&base, &c, &s).unwrap(), base);
    }

    #[test]
    fn test_asymmetric_application() {
        let (c, s) = factors(0.1, 1.05);
        let base = HarmonicConstituents::base();
        let out = compose(&base, &c, &s).unwrap();

        assert!((out.m2 - 1.2 * 1.1 * 1.05).abs() < 1e-12);
        assert!((out.s2 - 0.4 * 1.1 * 1.05).abs() < 1e-12);
        assert!((out.n2 - 0.25 * 1.1).abs() < 1e-12);
        assert!((out.q1 - 0.08 * 1.1).abs() < 1e-12);
        assert!((out.k1 - 0.6 * 1.05).abs() < 1e-12);
        assert!((out.o1 - 0.4 * 1.05).abs() < 1e-12);
        assert!((out.p1 - 0.2 * 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_is_rejected() {
        let (c, s) = factors(f64::NAN, 1.0);
        assert_eq!(
            compose(&HarmonicConstituents::base(), &c, &s),
            Err(TideError::NonFinite("composed constituents"))
        );
    }
}
