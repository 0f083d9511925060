//! # Engine Inputs
//!
//! Coordinates, dates and diagnostic records as they arrive from the rest of
//! the fishing-log application. Dates may come in as a typed timestamp or as a
//! raw string; both are normalized here, once, into a `DateTime<Utc>` so that
//! no calculator ever sees an unparsed date.

use crate::error::TideError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
///
/// Construction does not validate; call [`Coordinate::validate`] (the engine
/// does) so that out-of-range values are flagged rather than clamped.
///
/// # Example
/// ```
/// use tide_estimator_lib::input::Coordinate;
///
/// let osaka = Coordinate::new(34.6937, 135.5023);
/// assert!(osaka.validate().is_ok());
/// assert!(Coordinate::new(999.0, 999.0).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Degrees north, valid range [-90, 90]
    pub latitude: f64,
    /// Degrees east, valid range [-180, 180]
    pub longitude: f64,
    /// GPS accuracy radius in meters, if the source reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
        }
    }

    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// Reject non-finite or out-of-range values.
    pub fn validate(&self) -> Result<(), TideError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lng_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(TideError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Date-time formats accepted for raw string input, tried in order.
/// Naive values are interpreted as UTC.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// A record date before normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl DateInput {
    /// Convert to the canonical timestamp type.
    ///
    /// RFC 3339 strings keep their offset and are converted to UTC; the other
    /// accepted layouts are read as UTC wall-clock time. A bare date maps to
    /// midnight.
    pub fn normalize(&self) -> Result<DateTime<Utc>, TideError> {
        match self {
            DateInput::Timestamp(ts) => Ok(*ts),
            DateInput::Text(raw) => parse_date_text(raw),
        }
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(ts: DateTime<Utc>) -> Self {
        DateInput::Timestamp(ts)
    }
}

impl From<&str> for DateInput {
    fn from(raw: &str) -> Self {
        DateInput::Text(raw.to_string())
    }
}

fn parse_date_text(raw: &str) -> Result<DateTime<Utc>, TideError> {
    let text = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }

    Err(TideError::InvalidDate(raw.to_string()))
}

/// The slice of a fishing record the diagnostics engine looks at.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinate>,
    #[serde(default)]
    pub date: Option<DateInput>,
}

impl DiagnosticRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn at(mut self, coordinate: Coordinate) -> Self {
        self.coordinates = Some(coordinate);
        self
    }

    pub fn on(mut self, date: impl Into<DateInput>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// An id made only of whitespace counts as missing.
    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_coordinate_range_edges() {
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.0001, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_invalid_coordinate_is_not_clamped() {
        let err = Coordinate::new(999.0, 999.0).validate().unwrap_err();
        assert_eq!(
            err,
            TideError::InvalidCoordinate {
                latitude: 999.0,
                longitude: 999.0
            }
        );
    }

    #[test]
    fn test_normalize_accepted_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 7, 24, 6, 30, 0).unwrap();
        for raw in [
            "2025-07-24T06:30:00Z",
            "2025-07-24T15:30:00+09:00",
            "2025-07-24 06:30:00",
            "2025-07-24T06:30:00",
            "2025/07/24 06:30",
        ] {
            assert_eq!(DateInput::from(raw).normalize().unwrap(), expected, "{raw}");
        }

        let midnight = DateInput::from("2025/07/24").normalize().unwrap();
        assert_eq!((midnight.day(), midnight.hour()), (24, 0));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        for raw in ["", "not a date", "2025-13-01", "2025-02-30"] {
            assert!(
                matches!(DateInput::from(raw).normalize(), Err(TideError::InvalidDate(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_record_id_presence() {
        assert!(DiagnosticRecord::new("rec-1").has_id());
        assert!(!DiagnosticRecord::new("   ").has_id());
        assert!(!DiagnosticRecord::default().has_id());
    }
}
