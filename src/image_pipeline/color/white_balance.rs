//! White balance gain estimation

use crate::image_pipeline::color::math::{kelvin_to_rgb, luminance};
use crate::image_pipeline::common::LinearImageBuffer;

/// Bounds for gray-world gains.
pub const AUTO_GAIN_RANGE: (f32, f32) = (0.5, 3.0);
/// Bounds for Kelvin/tint gains.
pub const MANUAL_GAIN_RANGE: (f32, f32) = (0.5, 2.0);

const REFERENCE_KELVIN: f32 = 5500.0;
const VALID_LUMA: (f32, f32) = (0.05, 0.95);
const MIN_CHANNEL: f32 = 1e-3;

/// Per-channel multiplicative gains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteBalanceGains {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl WhiteBalanceGains {
    pub const IDENTITY: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        [rgb[0] * self.r, rgb[1] * self.g, rgb[2] * self.b]
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for WhiteBalanceGains {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn bounded_ratio(numerator: f32, denominator: f32, (lo, hi): (f32, f32)) -> f32 {
    if denominator <= MIN_CHANNEL {
        return 1.0;
    }
    (numerator / denominator).clamp(lo, hi)
}

/// Gray-world estimate over pixels whose luminance lies in [0.05, 0.95].
///
/// Returns identity gains when no pixel qualifies.
pub fn auto_white_balance_gains(image: &LinearImageBuffer) -> WhiteBalanceGains {
    let mut sum = [0.0f64; 3];
    let mut count = 0usize;

    for px in image.pixels() {
        let rgb = [px[0], px[1], px[2]];
        let l = luminance(rgb);
        if l < VALID_LUMA.0 || l > VALID_LUMA.1 {
            continue;
        }
        sum[0] += rgb[0] as f64;
        sum[1] += rgb[1] as f64;
        sum[2] += rgb[2] as f64;
        count += 1;
    }

    if count == 0 {
        return WhiteBalanceGains::IDENTITY;
    }

    let avg = sum.map(|s| (s / count as f64) as f32);
    WhiteBalanceGains {
        r: bounded_ratio(avg[1], avg[0], AUTO_GAIN_RANGE),
        g: 1.0,
        b: bounded_ratio(avg[1], avg[2], AUTO_GAIN_RANGE),
    }
}

/// Gains that neutralize an illuminant of `kelvin`, relative to 5500K.
///
/// `tint` runs from -100 (magenta) to +100 (green) and scales the green
/// gain by `1 + tint / 200`.
pub fn kelvin_white_balance_gains(kelvin: f32, tint: f32) -> WhiteBalanceGains {
    let reference = kelvin_to_rgb(REFERENCE_KELVIN);
    let illuminant = kelvin_to_rgb(kelvin).map(|c| c.max(MIN_CHANNEL));

    let raw = [
        reference[0] / illuminant[0],
        reference[1] / illuminant[1],
        reference[2] / illuminant[2],
    ];
    let tint_scale = 1.0 + tint.clamp(-100.0, 100.0) / 200.0;
    let (lo, hi) = MANUAL_GAIN_RANGE;

    WhiteBalanceGains {
        r: (raw[0] / raw[1]).clamp(lo, hi),
        g: tint_scale.clamp(lo, hi),
        b: (raw[2] / raw[1]).clamp(lo, hi),
    }
}
