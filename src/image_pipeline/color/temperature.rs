//! Scene color temperature estimate from highlight R/B balance

use crate::image_pipeline::color::math::luminance;
use crate::image_pipeline::common::LinearImageBuffer;

pub const DEFAULT_TEMPERATURE: f32 = 5500.0;

const HIGHLIGHT_LUMA: (f32, f32) = (0.7, 0.95);
const MIN_SAMPLES: usize = 100;
const KELVIN_RANGE: (f32, f32) = (2000.0, 12000.0);

/// Maps an R/B ratio to Kelvin over three linear segments.
pub fn ratio_to_kelvin(ratio: f32) -> f32 {
    let kelvin = if ratio >= 1.2 {
        4500.0 - (ratio - 1.2) * 5000.0
    } else if ratio >= 0.9 {
        5500.0 - (ratio - 1.0) * 5000.0
    } else {
        6000.0 + (0.9 - ratio) * 10000.0
    };
    kelvin.clamp(KELVIN_RANGE.0, KELVIN_RANGE.1)
}

/// Estimates the illuminant from pixels with luminance in [0.7, 0.95].
///
/// Falls back to [`DEFAULT_TEMPERATURE`] with fewer than 100 such pixels.
pub fn estimate_color_temperature(image: &LinearImageBuffer) -> f32 {
    let mut red = 0.0f64;
    let mut blue = 0.0f64;
    let mut samples = 0usize;

    for px in image.pixels() {
        let l = luminance([px[0], px[1], px[2]]);
        if l < HIGHLIGHT_LUMA.0 || l > HIGHLIGHT_LUMA.1 {
            continue;
        }
        red += px[0] as f64;
        blue += px[2] as f64;
        samples += 1;
    }

    if samples < MIN_SAMPLES || blue <= f64::EPSILON {
        return DEFAULT_TEMPERATURE;
    }
    ratio_to_kelvin((red / blue) as f32)
}
