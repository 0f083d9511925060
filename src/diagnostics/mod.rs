//! # Diagnostics & Quality
//!
//! Wraps the calculators with everything needed to explain an estimate:
//! the intermediate parameters, timing and memory figures, an integrity
//! check, an accuracy score, human-readable warnings and a bounded cache.

pub mod cache;
pub mod engine;
pub mod quality;
pub mod report;

pub use cache::{CacheKey, CacheStats, DiagnosticsCache};
pub use engine::TideEngine;
pub use quality::calculate_accuracy_score;
pub use report::{CalculationDetails, DebugReport, PerformanceMetrics, QualityAssessment};
