//! Seasonal and lunar-orbit variation derived from the calendar date.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Day of year used as the solstice reference.
const SOLSTICE_DAY: f64 = 172.0;
/// Anomalistic month approximation in days.
const PERIGEE_CYCLE_DAYS: f64 = 27.3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalVariationFactors {
    pub monthly_correction: f64,
    pub seasonal_amplitude: f64,
    pub perigee_apogee_effect: f64,
    pub solar_correction_factor: f64,
}

impl SeasonalVariationFactors {
    /// Best-effort default when the date is missing or unparsable.
    pub fn neutral() -> Self {
        Self {
            monthly_correction: 0.0,
            seasonal_amplitude: 0.0,
            perigee_apogee_effect: 0.0,
            solar_correction_factor: 1.0,
        }
    }
}

impl Default for SeasonalVariationFactors {
    fn default() -> Self {
        Self::neutral()
    }
}

pub fn seasonal_factors(at: DateTime<Utc>) -> SeasonalVariationFactors {
    let month = at.month() as f64;
    let day_of_year = at.ordinal() as f64;

    // Semi-annual cycle peaking in January and July (opposite sign).
    let monthly_correction = ((month - 1.0) * PI / 6.0).cos() * 0.1;
    let seasonal_amplitude = ((day_of_year - SOLSTICE_DAY) * TAU / 365.0).cos().abs() * 0.15;
    let perigee_apogee_effect = (day_of_year * TAU / PERIGEE_CYCLE_DAYS).sin() * 0.05;

    SeasonalVariationFactors {
        monthly_correction,
        seasonal_amplitude,
        perigee_apogee_effect,
        solar_correction_factor: 1.0 + 0.5 * monthly_correction + 0.5 * seasonal_amplitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn on(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_january_and_july_extremes() {
        let jan = seasonal_factors(on(2025, 1, 15));
        let jul = seasonal_factors(on(2025, 7, 15));
        assert!((jan.monthly_correction - 0.1).abs() < 1e-12);
        assert!((jul.monthly_correction + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_solstice_amplitude_peak() {
        // Day 172 of a common year is 21 June.
        let solstice = seasonal_factors(on(2025, 6, 21));
        assert!((solstice.seasonal_amplitude - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_over_a_leap_year() {
        let start = on(2024, 1, 1);
        for day in 0..366 {
            let f = seasonal_factors(start + chrono::Duration::days(day));
            assert!(f.monthly_correction.abs() <= 0.1 + 1e-12);
            assert!((0.0..=0.15 + 1e-12).contains(&f.seasonal_amplitude));
            assert!(f.perigee_apogee_effect.abs() <= 0.05 + 1e-12);
            assert!((0.85..=1.15).contains(&f.solar_correction_factor));
        }
    }

    #[test]
    fn test_solar_factor_formula() {
        let f = seasonal_factors(on(2025, 10, 18));
        let expected = 1.0 + 0.5 * f.monthly_correction + 0.5 * f.seasonal_amplitude;
        assert_eq!(f.solar_correction_factor, expected);
    }

    #[test]
    fn test_neutral_default() {
        let neutral = SeasonalVariationFactors::default();
        assert_eq!(neutral.solar_correction_factor, 1.0);
        assert_eq!(neutral.monthly_correction, 0.0);
    }
}
