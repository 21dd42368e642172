//! Luminance-weighted shadow lift with shadow-only denoise

use crate::image_pipeline::color::math::luminance;
use crate::image_pipeline::common::LinearImageBuffer;
use crate::image_pipeline::detail::bilateral_denoise_masked;

/// Full lift below this luminance; also the denoise gate.
pub const SHADOW_THRESHOLD: f32 = 0.15;
const FADE_END: f32 = 0.5;
const LIFT_SCALE: f32 = 0.3;
const LUMA_OFFSET: f32 = 0.1;

/// 1 below [`SHADOW_THRESHOLD`], falling linearly to 0 at 0.5.
pub fn shadow_weight(luma: f32) -> f32 {
    if luma <= SHADOW_THRESHOLD {
        1.0
    } else if luma >= FADE_END {
        0.0
    } else {
        1.0 - (luma - SHADOW_THRESHOLD) / (FADE_END - SHADOW_THRESHOLD)
    }
}

/// Multiplies all three channels by the same boost so hue is kept, then
/// denoises pixels that are still below [`SHADOW_THRESHOLD`].
pub fn lift_shadows(input: &LinearImageBuffer, lift: f32, noise_reduction: f32) -> LinearImageBuffer {
    let lifted = input.map_pixels(|rgb| {
        let l = luminance(rgb).max(0.0);
        let w = shadow_weight(l);
        if w == 0.0 {
            return rgb;
        }
        let boost = 1.0 + w * lift * LIFT_SCALE / (l + LUMA_OFFSET);
        rgb.map(|c| c * boost)
    });

    if noise_reduction <= 0.0 {
        return lifted;
    }
    bilateral_denoise_masked(&lifted, noise_reduction, |_, _, rgb| {
        luminance(rgb) < SHADOW_THRESHOLD
    })
}
