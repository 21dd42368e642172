//! Perceptual saturation with highlight and shadow protection

use crate::image_pipeline::color::math::{
    linear_srgb_to_oklab, luminance, oklab_chroma, oklab_to_linear_srgb, smoothstep,
};

/// Upper bound on OKLab chroma after adjustment.
pub const MAX_OKLAB_CHROMA: f32 = 0.5;

/// Weight in [0, 1] that fades boosts out near black and near white.
fn protection(lightness: f32) -> f32 {
    smoothstep(0.0, 0.15, lightness) * (1.0 - smoothstep(0.85, 1.0, lightness))
}

/// Scales OKLab chroma by `1 + boost / 100`.
///
/// Positive boosts are attenuated in deep shadows and bright highlights.
/// Channels pushed above 1.0 are pulled back toward luminance by
/// `1 / (1 + excess)` instead of being hard clipped. Output is in [0, 1].
pub fn adjust_saturation(rgb: [f32; 3], boost: f32) -> [f32; 3] {
    let input = rgb.map(|c| c.max(0.0));
    let lab = linear_srgb_to_oklab(input);

    let amount = boost / 100.0;
    let amount = if amount > 0.0 {
        amount * protection(lab[0])
    } else {
        amount
    };
    let factor = (1.0 + amount).max(0.0);

    let mut a = lab[1] * factor;
    let mut b = lab[2] * factor;
    let chroma = oklab_chroma([lab[0], a, b]);
    if chroma > MAX_OKLAB_CHROMA {
        let scale = MAX_OKLAB_CHROMA / chroma;
        a *= scale;
        b *= scale;
    }

    let out = oklab_to_linear_srgb([lab[0], a, b]);
    soft_compress(out).map(|c| c.clamp(0.0, 1.0))
}

fn soft_compress(rgb: [f32; 3]) -> [f32; 3] {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    if max <= 1.0 {
        return rgb;
    }
    let y = luminance(rgb);
    let excess = max - 1.0;
    rgb.map(|c| y + (c - y) / (1.0 + excess))
}
