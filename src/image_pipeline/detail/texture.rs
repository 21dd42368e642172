//! Texture protection: pulls high-variance areas back toward the
//! pre-denoise image so fine texture is not smoothed away.

use crate::image_pipeline::color::math::luminance;
use crate::image_pipeline::common::LinearImageBuffer;

/// 3x3 luma variance above which a pixel counts as texture.
pub const TEXTURE_VARIANCE_THRESHOLD: f32 = 0.0005;
const TEXTURE_GAIN: f32 = 200.0;

/// Variance of luma over the 3x3 window centered on `(x, y)`.
pub fn local_luma_variance(image: &LinearImageBuffer, x: usize, y: usize) -> f32 {
    let mut sum = 0.0f32;
    let mut sum_sq = 0.0f32;
    for dy in -1..=1 {
        for dx in -1..=1 {
            let l = luminance(image.pixel_clamped(x as isize + dx, y as isize + dy));
            sum += l;
            sum_sq += l * l;
        }
    }
    let mean = sum / 9.0;
    (sum_sq / 9.0 - mean * mean).max(0.0)
}

/// Blends `denoised` back toward `original` in proportion to how far the
/// local variance exceeds [`TEXTURE_VARIANCE_THRESHOLD`].
pub fn protect_texture(
    original: &LinearImageBuffer,
    denoised: &LinearImageBuffer,
    strength: f32,
) -> LinearImageBuffer {
    let mut out = denoised.clone();
    for y in 0..original.height() {
        for x in 0..original.width() {
            let excess = local_luma_variance(original, x, y) - TEXTURE_VARIANCE_THRESHOLD;
            if excess <= 0.0 {
                continue;
            }
            let blend = (excess * strength * TEXTURE_GAIN).clamp(0.0, 1.0);
            let o = original.pixel(x, y);
            let d = denoised.pixel(x, y);
            out.set_pixel(
                x,
                y,
                [
                    d[0] + (o[0] - d[0]) * blend,
                    d[1] + (o[1] - d[1]) * blend,
                    d[2] + (o[2] - d[2]) * blend,
                ],
            );
        }
    }
    out
}
