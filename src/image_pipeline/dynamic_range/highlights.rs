//! Per-channel highlight reconstruction

use crate::image_pipeline::common::LinearImageBuffer;

/// A channel at or above this value counts as clipped.
pub const CLIP_THRESHOLD: f32 = 0.95;

// Ratio of a channel to the mean of the other two in typical bright
// highlights, indexed by the clipped channel.
const CHANNEL_FACTORS: [f32; 3] = [1.1, 1.2, 0.9];
const TWO_CLIPPED_SCALE: f32 = 0.3;

/// Reconstructs clipped channels of one pixel.
pub fn recover_pixel(rgb: [f32; 3], strength: f32) -> [f32; 3] {
    let clipped = rgb.map(|c| c >= CLIP_THRESHOLD);
    let count = clipped.iter().filter(|&&c| c).count();
    let mut out = rgb;

    match count {
        1 => {
            let i = clipped.iter().position(|&c| c).unwrap_or(0);
            let others = (rgb[(i + 1) % 3] + rgb[(i + 2) % 3]) * 0.5;
            let estimate = (others * CHANNEL_FACTORS[i]).clamp(0.0, 1.0);
            out[i] = rgb[i] + (estimate - rgb[i]) * strength;
        }
        2 => {
            let u = clipped.iter().position(|&c| !c).unwrap_or(0);
            let blend = strength * TWO_CLIPPED_SCALE;
            for c in 0..3 {
                if c != u {
                    out[c] = rgb[c] + (rgb[u] - rgb[c]) * blend;
                }
            }
        }
        _ => {}
    }
    out
}

pub fn recover_highlights(input: &LinearImageBuffer, strength: f32) -> LinearImageBuffer {
    let strength = strength.clamp(0.0, 1.0);
    input.map_pixels(|rgb| recover_pixel(rgb, strength))
}
