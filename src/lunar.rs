//! Moon phase from elapsed time since a reference new moon.
//!
//! Mean synodic month only: no perturbation terms, so phase boundaries can be
//! off by several hours. That is well inside what the tide classification
//! needs. The lagged phase angle used by the tide model is also derived here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_2;

/// Reference new moon, 2000-01-06 18:14 UTC, as Unix seconds.
pub const NEW_MOON_EPOCH_SECS: i64 = 947_182_440;

/// Lag between syzygy and the largest tides (the "age of the tide").
pub const TIDAL_AGE_DAYS: f64 = 1.5;
pub const TIDAL_AGE_SECS: i64 = 129_600;

/// Eight-way moon phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const BY_INDEX: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Phase index 0–7 (0 = new, 4 = full).
    pub fn from_index(index: u8) -> Self {
        Self::BY_INDEX[(index & 7) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "new moon",
            MoonPhase::WaxingCrescent => "waxing crescent",
            MoonPhase::FirstQuarter => "first quarter",
            MoonPhase::WaxingGibbous => "waxing gibbous",
            MoonPhase::FullMoon => "full moon",
            MoonPhase::WaningGibbous => "waning gibbous",
            MoonPhase::LastQuarter => "last quarter",
            MoonPhase::WaningCrescent => "waning crescent",
        }
    }

    /// Name shown in the fishing log.
    pub fn label_ja(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "新月",
            MoonPhase::WaxingCrescent => "三日月",
            MoonPhase::FirstQuarter => "上弦の月",
            MoonPhase::WaxingGibbous => "十三夜",
            MoonPhase::FullMoon => "満月",
            MoonPhase::WaningGibbous => "寝待月",
            MoonPhase::LastQuarter => "下弦の月",
            MoonPhase::WaningCrescent => "有明月",
        }
    }
}

impl std::fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Moon state at an instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LunarState {
    pub phase: MoonPhase,
    /// Days since the most recent new moon, in [0, synodic month)
    pub age_days: f64,
    /// Illuminated fraction, 0 at new moon and 1 at full
    pub illumination: f64,
}

fn days_since_epoch(at: DateTime<Utc>) -> f64 {
    (at.timestamp_millis() - NEW_MOON_EPOCH_SECS * 1000) as f64 / 86_400_000.0
}

/// Age of the moon in days.
pub fn moon_age_days(at: DateTime<Utc>) -> f64 {
    days_since_epoch(at).rem_euclid(SYNODIC_MONTH_DAYS)
}

pub fn moon_state(at: DateTime<Utc>) -> LunarState {
    let age_days = moon_age_days(at);
    let fraction = age_days / SYNODIC_MONTH_DAYS;
    // Centered bins: "new moon" covers the last and first sixteenth.
    let index = ((fraction * 8.0) + 0.5).floor() as u8 & 7;

    LunarState {
        phase: MoonPhase::from_index(index),
        age_days,
        illumination: (1.0 - (fraction * TAU).cos()) / 2.0,
    }
}

pub fn moon_phase(at: DateTime<Utc>) -> MoonPhase {
    moon_state(at).phase
}

/// Lunar elongation in radians, lagged by the tidal age.
///
/// `cos(2θ)` is +1 at the tidal response to new and full moon and -1 at the
/// response to the quarters.
pub fn tidal_phase_angle(at: DateTime<Utc>) -> f64 {
    let lagged = (days_since_epoch(at) - TIDAL_AGE_DAYS).rem_euclid(SYNODIC_MONTH_DAYS);
    lagged / SYNODIC_MONTH_DAYS * TAU
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(NEW_MOON_EPOCH_SECS, 0).unwrap()
    }

    #[test]
    fn test_epoch_is_new_moon() {
        let state = moon_state(epoch());
        assert_eq!(state.phase, MoonPhase::NewMoon);
        assert!(state.age_days.abs() < 1e-9);
        assert!(state.illumination < 1e-9);
    }

    #[test]
    fn test_phase_progression_over_one_month() {
        let start = epoch();
        let expected = [
            (0.0, MoonPhase::NewMoon),
            (3.7, MoonPhase::WaxingCrescent),
            (7.4, MoonPhase::FirstQuarter),
            (11.1, MoonPhase::WaxingGibbous),
            (14.8, MoonPhase::FullMoon),
            (18.5, MoonPhase::WaningGibbous),
            (22.1, MoonPhase::LastQuarter),
            (25.8, MoonPhase::WaningCrescent),
            (29.4, MoonPhase::NewMoon),
        ];
        for (days, phase) in expected {
            let at = start + Duration::minutes((days * 1440.0) as i64);
            assert_eq!(moon_phase(at), phase, "day {days}");
        }
    }

    #[test]
    fn test_known_full_moon_2025() {
        // Full moon on 2025-07-10 20:37 UTC.
        let at = Utc.with_ymd_and_hms(2025, 7, 10, 20, 37, 0).unwrap();
        let state = moon_state(at);
        assert_eq!(state.phase, MoonPhase::FullMoon);
        assert!(state.illumination > 0.97);
    }

    #[test]
    fn test_dates_before_epoch_wrap() {
        let at = epoch() - Duration::days(3);
        let age = moon_age_days(at);
        assert!((age - (SYNODIC_MONTH_DAYS - 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_tidal_angle_lags_new_moon() {
        let at = epoch() + Duration::seconds(TIDAL_AGE_SECS);
        assert!(tidal_phase_angle(at) < 1e-6);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MoonPhase::FullMoon.label_ja(), "満月");
        assert_eq!(MoonPhase::from_index(9), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::LastQuarter.index(), 6);
    }
}
