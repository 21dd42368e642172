//! Color-correction matrix and output color-space encoding

use crate::image_pipeline::color::math::srgb_encode;
use crate::image_pipeline::config::ColorSpace;

/// Sensor-native to linear sRGB. Rows sum to one so neutrals stay neutral.
pub const DEFAULT_COLOR_MATRIX: [[f32; 3]; 3] = [
    [1.55, -0.40, -0.15],
    [-0.25, 1.45, -0.20],
    [-0.05, -0.45, 1.50],
];

/// Linear sRGB primaries to Display P3 primaries (D65).
pub const SRGB_TO_DISPLAY_P3: [[f32; 3]; 3] = [
    [0.822_462_1, 0.177_538, 0.0],
    [0.033_194_1, 0.966_805_8, 0.0],
    [0.017_082_7, 0.072_397_4, 0.910_519_9],
];

const ADOBE_RGB_GAMMA: f32 = 2.19922;
const PROPHOTO_GAMMA: f32 = 1.8;

#[inline]
pub fn apply_matrix(m: &[[f32; 3]; 3], rgb: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
        m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
        m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
    ]
}

/// Encodes linear RGB for `space`. Input is clamped to [0, 1] first.
pub fn encode_pixel(rgb: [f32; 3], space: ColorSpace) -> [f32; 3] {
    let rgb = rgb.map(|c| c.clamp(0.0, 1.0));
    match space {
        ColorSpace::Srgb => rgb.map(srgb_encode),
        ColorSpace::DciP3 => apply_matrix(&SRGB_TO_DISPLAY_P3, rgb).map(|c| srgb_encode(c.clamp(0.0, 1.0))),
        ColorSpace::AdobeRgb => rgb.map(|c| c.powf(1.0 / ADOBE_RGB_GAMMA)),
        ColorSpace::ProPhoto => rgb.map(|c| c.powf(1.0 / PROPHOTO_GAMMA)),
    }
}
