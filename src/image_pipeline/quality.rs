//! Quality scoring of a finished image

mod analyzer;
pub mod types;


pub use analyzer::QualityAnalyzer;
pub use types::{DynamicRangeAnalysis, ExposureAnalysis, NoiseAnalysis, QualityReport, SharpnessAnalysis};
