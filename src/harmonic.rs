//! # Harmonic Tide Model
//!
//! The simplified harmonic model at the bottom of the engine: seven fixed
//! constituents whose cosines are summed into a height.
//!
//! ```text
//! h(t) = Σᵢ Aᵢ cos(ωᵢ t + φᵢ)
//! ```
//!
//! `t` is measured in hours from [`model_epoch`], the reference new moon
//! shifted by the tidal age. Because M2 and S2 both carry zero phase, the
//! two semidiurnal terms line up (spring tide) one tidal age after every new
//! and full moon, which keeps the curve consistent with the moon phase used
//! for classification.
//!
//! Amplitudes are in arbitrary height units modeled on a temperate
//! semidiurnal bay. No bathymetry, no station database.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::lunar::{NEW_MOON_EPOCH_SECS, TIDAL_AGE_SECS};

/// The seven constituents of the model, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constituent {
    M2,
    S2,
    N2,
    K1,
    O1,
    P1,
    Q1,
}

impl Constituent {
    pub const ALL: [Constituent; 7] = [
        Constituent::M2,
        Constituent::S2,
        Constituent::N2,
        Constituent::K1,
        Constituent::O1,
        Constituent::P1,
        Constituent::Q1,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Constituent::M2 => "M2",
            Constituent::S2 => "S2",
            Constituent::N2 => "N2",
            Constituent::K1 => "K1",
            Constituent::O1 => "O1",
            Constituent::P1 => "P1",
            Constituent::Q1 => "Q1",
        }
    }

    /// Period in hours.
    pub fn period_hours(self) -> f64 {
        match self {
            Constituent::M2 => 12.420_601_2,
            Constituent::S2 => 12.0,
            Constituent::N2 => 12.658_347_51,
            Constituent::K1 => 23.934_469_66,
            Constituent::O1 => 25.819_341_67,
            Constituent::P1 => 24.065_890_16,
            Constituent::Q1 => 26.868_350,
        }
    }

    /// Angular speed ω = 2π/T in radians per hour.
    pub fn angular_speed(self) -> f64 {
        TAU / self.period_hours()
    }

    /// Phase lag φ in radians at the model epoch.
    pub fn phase(self) -> f64 {
        let degrees: f64 = match self {
            Constituent::M2 | Constituent::S2 => 0.0,
            Constituent::N2 => 138.0,
            Constituent::K1 => 161.0,
            Constituent::O1 => 145.0,
            Constituent::P1 => 158.0,
            Constituent::Q1 => 132.0,
        };
        degrees.to_radians()
    }
}

/// Amplitude per constituent.
///
/// Used for both the deployment-wide base table and the per-request final
/// set produced by the composer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct HarmonicConstituents {
    pub m2: f64,
    pub s2: f64,
    pub n2: f64,
    pub k1: f64,
    pub o1: f64,
    pub p1: f64,
    pub q1: f64,
}

impl HarmonicConstituents {
    /// Base amplitudes, constant for the deployment.
    pub const BASE: HarmonicConstituents = HarmonicConstituents {
        m2: 1.2,
        s2: 0.4,
        n2: 0.25,
        k1: 0.6,
        o1: 0.4,
        p1: 0.2,
        q1: 0.08,
    };

    pub const ZERO: HarmonicConstituents = HarmonicConstituents {
        m2: 0.0,
        s2: 0.0,
        n2: 0.0,
        k1: 0.0,
        o1: 0.0,
        p1: 0.0,
        q1: 0.0,
    };

    pub fn base() -> Self {
        Self::BASE
    }

    pub fn amplitude(&self, constituent: Constituent) -> f64 {
        match constituent {
            Constituent::M2 => self.m2,
            Constituent::S2 => self.s2,
            Constituent::N2 => self.n2,
            Constituent::K1 => self.k1,
            Constituent::O1 => self.o1,
            Constituent::P1 => self.p1,
            Constituent::Q1 => self.q1,
        }
    }

    /// `(constituent, amplitude)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Constituent, f64)> + '_ {
        Constituent::ALL.iter().map(move |&c| (c, self.amplitude(c)))
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, a)| a.is_finite())
    }

    /// Height at `hours` since [`model_epoch`].
    pub fn height_at_hours(&self, hours: f64) -> f64 {
        self.iter()
            .map(|(c, amplitude)| amplitude * (c.angular_speed() * hours + c.phase()).cos())
            .sum()
    }

    /// Height at an absolute instant.
    pub fn height(&self, at: DateTime<Utc>) -> f64 {
        self.height_at_hours(hours_since_epoch(at))
    }
}

impl Default for HarmonicConstituents {
    fn default() -> Self {
        Self::BASE
    }
}

/// Seconds from the Unix epoch to the model epoch (reference new moon plus
/// the tidal age).
pub const MODEL_EPOCH_SECS: i64 = NEW_MOON_EPOCH_SECS + TIDAL_AGE_SECS;

/// The instant at which every constituent's argument equals its phase.
pub fn model_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(MODEL_EPOCH_SECS, 0)
        .single()
        .unwrap_or_default()
}

/// Model time in hours, with millisecond resolution.
pub fn hours_since_epoch(at: DateTime<Utc>) -> f64 {
    (at.timestamp_millis() - MODEL_EPOCH_SECS * 1000) as f64 / 3_600_000.0
}
