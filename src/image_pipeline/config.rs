//! Processing parameters module
//!
//! Immutable per-stage parameter records supplied by the settings
//! collaborator, either built in code or loaded from JSON.

mod builder;
pub mod parameters;

pub use builder::ProcessingParametersBuilder;
pub use parameters::{
    ColorParameters, ColorSpace, DetailParameters, DynamicRangeParameters, LookParameters,
    ProcessingParameters, WhiteBalanceMode, WhiteBalancePreset,
};
