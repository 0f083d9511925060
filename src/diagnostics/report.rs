//! Structured explanation of one estimate.

use crate::harmonic::HarmonicConstituents;
use crate::variation::{CoordinateVariationFactors, SeasonalVariationFactors};
use serde::{Deserialize, Serialize};

/// Inputs and outputs of the parameter composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDetails {
    pub base: HarmonicConstituents,
    pub coordinate_factors: CoordinateVariationFactors,
    pub seasonal_factors: SeasonalVariationFactors,
    #[serde(rename = "final")]
    pub final_constituents: HarmonicConstituents,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Wall-clock time of the uncached path, at least 1
    pub calculation_time_ms: u64,
    /// Resident memory delta; 0 when unknown
    pub memory_usage_kb: u64,
    pub cache_hit_rate_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub data_integrity: bool,
    /// In [0, 1]
    pub calculation_accuracy: f64,
    /// Order: coordinate, seasonal, integrity
    pub warnings: Vec<String>,
}

/// Diagnostic report returned by
/// [`TideEngine::collect_diagnostics`](crate::diagnostics::TideEngine::collect_diagnostics).
///
/// Always an owned value: the cache stores its own copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    pub calculation: CalculationDetails,
    pub performance: PerformanceMetrics,
    pub quality: QualityAssessment,
}

impl DebugReport {
    /// Zeroed report for a collection that failed part way.
    pub fn failed(reason: &str) -> Self {
        DebugReport {
            calculation: CalculationDetails {
                base: HarmonicConstituents::ZERO,
                coordinate_factors: CoordinateVariationFactors::zero(),
                seasonal_factors: SeasonalVariationFactors::neutral(),
                final_constituents: HarmonicConstituents::ZERO,
            },
            performance: PerformanceMetrics::default(),
            quality: QualityAssessment {
                data_integrity: false,
                calculation_accuracy: 0.0,
                warnings: vec![format!("diagnostics collection failed: {reason}")],
            },
        }
    }
}
