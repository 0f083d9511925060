//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-config.toml file.
//! It provides a centralized way to configure the geographic reference point, the
//! curve sampling parameters and the diagnostics cache.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "tide-config.toml";

/// Longest initial curve window, one month
pub const MAX_WINDOW_HOURS: i64 = 24 * 31;

/// Most window doublings the event search may make
pub const MAX_WINDOW_RETRIES: u32 = 4;

/// Engine configuration loaded from tide-config.toml
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Point against which geographic correction is measured
    #[serde(default)]
    pub reference: ReferencePoint,
    /// Tide curve sampling and event search
    #[serde(default)]
    pub curve: CurveConfig,
    /// Diagnostics cache sizing
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Fixed reference point for coordinate variation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ReferencePoint {
    /// Human-readable name for reference
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for ReferencePoint {
    fn default() -> Self {
        ReferencePoint {
            name: "Tokyo Bay".to_string(),
            latitude: 35.6762,
            longitude: 139.6503,
        }
    }
}

/// Tide curve sampling configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CurveConfig {
    /// Initial search window from the query time, in hours
    pub window_hours: i64,
    /// Sample spacing in minutes
    pub step_minutes: i64,
    /// How many times the window may be doubled when no event is found
    pub max_window_retries: u32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        CurveConfig {
            window_hours: 24,
            step_minutes: 10,
            max_window_retries: 3,
        }
    }
}

/// Diagnostics cache configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Maximum number of cached reports before oldest-first eviction
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { capacity: 20 }
    }
}

impl Config {
    /// Load configuration from tide-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    let config = config.sanitized();
                    tracing::info!(
                        reference = %config.reference.name,
                        path = %path.display(),
                        "loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "invalid config file format, using defaults: {}",
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(
                    path = %path.display(),
                    "no config file found, using default configuration (Tokyo Bay)"
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        tracing::info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Replace values the engine cannot run with by their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = CurveConfig::default();
        if self.curve.window_hours <= 0 {
            tracing::warn!(value = self.curve.window_hours, "window_hours must be positive");
            self.curve.window_hours = defaults.window_hours;
        } else if self.curve.window_hours > MAX_WINDOW_HOURS {
            tracing::warn!(
                value = self.curve.window_hours,
                "window_hours capped at {}",
                MAX_WINDOW_HOURS
            );
            self.curve.window_hours = MAX_WINDOW_HOURS;
        }
        if self.curve.max_window_retries > MAX_WINDOW_RETRIES {
            tracing::warn!(
                value = self.curve.max_window_retries,
                "max_window_retries capped at {}",
                MAX_WINDOW_RETRIES
            );
            self.curve.max_window_retries = MAX_WINDOW_RETRIES;
        }
        if self.curve.step_minutes <= 0 || self.curve.step_minutes > self.curve.window_hours * 60 {
            tracing::warn!(value = self.curve.step_minutes, "step_minutes out of range");
            self.curve.step_minutes = defaults.step_minutes;
        }
        if self.cache.capacity == 0 {
            tracing::warn!("cache capacity must be at least 1");
            self.cache.capacity = CacheConfig::default().capacity;
        }
        if !crate::input::Coordinate::new(self.reference.latitude, self.reference.longitude)
            .is_valid()
        {
            tracing::warn!(
                latitude = self.reference.latitude,
                longitude = self.reference.longitude,
                "reference point out of range"
            );
            self.reference = ReferencePoint::default();
        }
        self
    }
}
