//! Tone module: log encoding and the flat grading profile

mod flat_profile;
mod log_curve;


pub use flat_profile::{FlatProfileGenerator, FLAT_CONTRAST_SCALE, FLAT_SATURATION, FLAT_SHADOW_LIFT};
pub use log_curve::{ToneEncoder, MID_GRAY_IN, MID_GRAY_OUT, SHOULDER_CEILING};
