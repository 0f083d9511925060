//! Correction factors applied on top of the base constituents.
//!
//! Both calculators are pure and recomputed per request:
//! - [`coordinate`]: offset from the configured reference point
//! - [`seasonal`]: time-of-year and lunar-orbit offsets

pub mod coordinate;
pub mod seasonal;

pub use coordinate::{coordinate_factors, CoordinateVariationFactors};
pub use seasonal::{seasonal_factors, SeasonalVariationFactors};
