//! Bounded oldest-first cache of diagnostic reports.
//!
//! Insertion order lives in an explicit queue next to the lookup table, so
//! eviction never depends on map iteration order.

use super::report::DebugReport;
use crate::input::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Cache key for one record.
///
/// Coordinates are rounded to 3 decimals (≈111 m) and the date is truncated
/// to the day, so nearby records on the same day share an entry. Records
/// without an id, a usable coordinate or a usable date are never stored, since
/// their integrity verdict differs from a complete record at the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Cacheable(String),
    Uncacheable,
}

impl CacheKey {
    pub fn for_record(
        has_id: bool,
        coordinate: Option<&Coordinate>,
        date: Option<DateTime<Utc>>,
    ) -> Self {
        match (has_id, coordinate, date) {
            (true, Some(c), Some(d)) => CacheKey::Cacheable(format!(
                "{:.3}_{:.3}_{}",
                round_millidegrees(c.latitude),
                round_millidegrees(c.longitude),
                d.format("%Y-%m-%d")
            )),
            _ => CacheKey::Uncacheable,
        }
    }

    pub fn as_cacheable(&self) -> Option<&str> {
        match self {
            CacheKey::Cacheable(key) => Some(key),
            CacheKey::Uncacheable => None,
        }
    }
}

/// Round to 3 decimals; `+ 0.0` folds `-0.0` into `0.0`.
fn round_millidegrees(degrees: f64) -> f64 {
    (degrees * 1000.0).round() / 1000.0 + 0.0
}

/// Hit/miss counters and occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hits over lookups, as a percentage; 0 before the first lookup.
    pub fn hit_rate_percent(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 * 100.0 / lookups as f64
        }
    }
}

#[derive(Debug)]
pub struct DiagnosticsCache {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, DebugReport>,
    hits: u64,
    misses: u64,
}

impl DiagnosticsCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        DiagnosticsCache {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Copy of the cached report, counting the lookup.
    pub fn get(&mut self, key: &CacheKey) -> Option<DebugReport> {
        let found = key
            .as_cacheable()
            .and_then(|k| self.entries.get(k))
            .cloned();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        key.as_cacheable()
            .is_some_and(|k| self.entries.contains_key(k))
    }

    /// Store a copy of `report`. Uncacheable keys are ignored. Returns the
    /// evicted key, if the insert pushed one out.
    pub fn insert(&mut self, key: &CacheKey, report: &DebugReport) -> Option<String> {
        let key = key.as_cacheable()?;

        if let Some(existing) = self.entries.get_mut(key) {
            *existing = report.clone();
            return None;
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                evicted = Some(oldest);
            }
        }

        self.order.push_back(key.to_string());
        self.entries.insert(key.to_string(), report.clone());
        evicted
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            len: self.entries.len(),
            capacity: self.capacity,
        }
    }
}
