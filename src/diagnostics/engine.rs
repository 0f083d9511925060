//! # Tide Engine
//!
//! The single entry point the application talks to. One engine is built per
//! process and shared by reference (or `Arc`); it owns the diagnostics cache,
//! so there is no hidden global state.
//!
//! ## Failure Policy
//! Neither [`TideEngine::estimate_tide`] nor [`TideEngine::collect_diagnostics`]
//! can fail. Bad inputs degrade the calculation (zero coordinate factors,
//! neutral seasonal factors) and are reported through the quality block.
//! Internal faults, including panics inside a calculator, are turned into a
//! zeroed fallback report or a degraded estimate.
//!
//! ## Locking
//! The cache sits behind a mutex that is only held for lookups and inserts,
//! never while the model runs. Two callers missing on the same key may both
//! compute; the second insert overwrites the first with an equal report.

use super::cache::{CacheKey, CacheStats, DiagnosticsCache};
use super::quality;
use super::report::{CalculationDetails, DebugReport, PerformanceMetrics, QualityAssessment};
use crate::composer::compose;
use crate::config::Config;
use crate::error::TideError;
use crate::estimate::TideEstimate;
use crate::harmonic::HarmonicConstituents;
use crate::input::{Coordinate, DiagnosticRecord};
use crate::variation::{coordinate_factors, seasonal_factors, SeasonalVariationFactors};
use chrono::{DateTime, Utc};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

#[derive(Debug)]
pub struct TideEngine {
    config: Config,
    cache: Mutex<DiagnosticsCache>,
}

impl Default for TideEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl TideEngine {
    pub fn new(config: Config) -> Self {
        let config = config.sanitized();
        let cache = DiagnosticsCache::new(config.cache.capacity);
        TideEngine {
            config,
            cache: Mutex::new(cache),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Estimate the tide at `coordinate` for `timestamp`.
    ///
    /// A missing or out-of-range coordinate falls back to the reference point
    /// (zero geographic correction).
    pub fn estimate_tide(
        &self,
        coordinate: Option<&Coordinate>,
        timestamp: DateTime<Utc>,
    ) -> TideEstimate {
        let usable = usable_coordinate(coordinate);
        if usable.is_none() && coordinate.is_some() {
            tracing::warn!("coordinate out of range, estimating without geographic correction");
        }
        let result = self
            .calculate(usable, Some(timestamp))
            .and_then(|calc| {
                TideEstimate::assemble(&calc.final_constituents, timestamp, &self.config.curve)
            });

        match result {
            Ok(estimate) => {
                tracing::debug!(
                    tide_type = %estimate.tide_type,
                    ratio = estimate.amplitude_ratio,
                    range = estimate.tide_range,
                    "tide estimated"
                );
                estimate
            }
            Err(e) => {
                tracing::warn!("tide estimation degraded: {}", e);
                TideEstimate::degraded(timestamp)
            }
        }
    }

    /// Explain, score and cache the calculation for `record`.
    pub fn collect_diagnostics(&self, record: &DiagnosticRecord) -> DebugReport {
        let date = match record.date.as_ref().map(|d| d.normalize()) {
            Some(Ok(ts)) => Some(ts),
            Some(Err(e)) => {
                tracing::warn!(id = ?record.id, "{}", e);
                None
            }
            None => None,
        };

        let coordinate = usable_coordinate(record.coordinates.as_ref());
        if coordinate.is_none() && record.coordinates.is_some() {
            tracing::warn!(
                id = ?record.id,
                "coordinate out of range, ignoring geographic correction"
            );
        }
        let key = CacheKey::for_record(record.has_id(), coordinate, date);

        if let Some(hit) = self.cache().get(&key) {
            tracing::debug!(key = ?key, "diagnostics cache hit");
            return hit;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.collect_uncached(record, coordinate, date)
        }));
        let report = match outcome {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                tracing::warn!(id = ?record.id, "diagnostics collection failed: {}", e);
                return DebugReport::failed(&e.to_string());
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::warn!(id = ?record.id, "diagnostics collection panicked: {}", reason);
                return DebugReport::failed(&reason);
            }
        };

        if let Some(evicted) = self.cache().insert(&key, &report) {
            tracing::debug!(evicted = %evicted, "diagnostics cache full, evicted oldest");
        }
        report
    }

    /// Drop all cached reports and reset hit statistics.
    pub fn clear_diagnostics_cache(&self) {
        let mut cache = self.cache();
        let dropped = cache.len();
        cache.clear();
        tracing::info!(dropped, "diagnostics cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache().stats()
    }

    /// Whether a report for `record` is currently cached. Does not count as a
    /// lookup.
    pub fn is_cached(&self, record: &DiagnosticRecord) -> bool {
        let date = record.date.as_ref().and_then(|d| d.normalize().ok());
        let key = CacheKey::for_record(
            record.has_id(),
            usable_coordinate(record.coordinates.as_ref()),
            date,
        );
        self.cache().contains(&key)
    }

    fn cache(&self) -> MutexGuard<'_, DiagnosticsCache> {
        // The cache holds plain values; a panic elsewhere cannot leave it torn.
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn calculate(
        &self,
        coordinate: Option<&Coordinate>,
        date: Option<DateTime<Utc>>,
    ) -> Result<CalculationDetails, TideError> {
        let base = HarmonicConstituents::base();
        let coordinate_factors = coordinate_factors(coordinate, &self.config.reference);
        let seasonal_factors = date
            .map(seasonal_factors)
            .unwrap_or_else(SeasonalVariationFactors::neutral);
        let final_constituents = compose(&base, &coordinate_factors, &seasonal_factors)?;

        Ok(CalculationDetails {
            base,
            coordinate_factors,
            seasonal_factors,
            final_constituents,
        })
    }

    fn collect_uncached(
        &self,
        record: &DiagnosticRecord,
        coordinate: Option<&Coordinate>,
        date: Option<DateTime<Utc>>,
    ) -> Result<DebugReport, TideError> {
        let started = Instant::now();
        let memory_before = resident_memory_kb();

        let calculation = self.calculate(coordinate, date)?;
        // Run only to surface curve faults (non-finite heights, no extremum),
        // which must fail collection; the events themselves are not reported.
        if let Some(at) = date {
            crate::curve::outlook(&calculation.final_constituents, at, &self.config.curve)?;
        }

        let integrity = quality::check_integrity(record, date.is_some());
        let accuracy =
            quality::calculate_accuracy_score(&calculation.base, &calculation.final_constituents);
        let warnings = quality::generate_warnings(
            &calculation.coordinate_factors,
            &calculation.seasonal_factors,
            integrity,
        );

        let memory_usage_kb = match (memory_before, resident_memory_kb()) {
            (Some(before), Some(after)) => after.saturating_sub(before),
            _ => 0,
        };
        let calculation_time_ms = (started.elapsed().as_millis() as u64).max(1);

        Ok(DebugReport {
            calculation,
            performance: PerformanceMetrics {
                calculation_time_ms,
                memory_usage_kb,
                cache_hit_rate_percent: self.cache_stats().hit_rate_percent(),
            },
            quality: QualityAssessment {
                data_integrity: integrity,
                calculation_accuracy: accuracy,
                warnings,
            },
        })
    }
}

/// `coordinate` if present and in range.
fn usable_coordinate(coordinate: Option<&Coordinate>) -> Option<&Coordinate> {
    coordinate.filter(|c| c.is_valid())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Resident set size in KB, where the platform exposes it.
#[cfg(target_os = "linux")]
fn resident_memory_kb() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_kb() -> Option<u64> {
    None
}
