//! Color module
//!
//! White balance, color-correction matrix, perceptual saturation,
//! skin-tone refinement and output color-space encoding. The pure
//! per-pixel formulas live in [`math`] so the still pipeline and the live
//! preview share one implementation.

mod encoding;
mod engine;
pub mod math;
mod saturation;
mod skin;
mod temperature;
mod white_balance;

#[cfg(test)]
mod tests;

pub use encoding::{apply_matrix, encode_pixel, DEFAULT_COLOR_MATRIX, SRGB_TO_DISPLAY_P3};
pub use engine::{ColorEngine, ColorOutput};
pub use saturation::{adjust_saturation, MAX_OKLAB_CHROMA};
pub use skin::{refine_skin_tone, skin_confidence};
pub use temperature::{estimate_color_temperature, ratio_to_kelvin, DEFAULT_TEMPERATURE};
pub use white_balance::{
    auto_white_balance_gains, kelvin_white_balance_gains, WhiteBalanceGains, AUTO_GAIN_RANGE,
    MANUAL_GAIN_RANGE,
};
