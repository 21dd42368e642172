//! Windowed bilateral filter.
//!
//! Weights are the product of a spatial Gaussian over a 5x5 window and a
//! range Gaussian over the RGB distance to the center pixel. Both sigmas
//! scale with the 0-1 strength.

use crate::image_pipeline::common::LinearImageBuffer;

const RADIUS: isize = 2;
const MAX_SPATIAL_SIGMA: f32 = 2.0;
const MAX_RANGE_SIGMA: f32 = 0.2;
const MIN_SIGMA: f32 = 1e-3;

struct Kernel {
    spatial: [[f32; 5]; 5],
    inv_two_range_var: f32,
}

impl Kernel {
    fn new(strength: f32) -> Self {
        let strength = strength.clamp(0.0, 1.0);
        let sigma_s = (MAX_SPATIAL_SIGMA * strength).max(MIN_SIGMA);
        let sigma_r = (MAX_RANGE_SIGMA * strength).max(MIN_SIGMA);
        let mut spatial = [[0.0f32; 5]; 5];
        for dy in -RADIUS..=RADIUS {
            for dx in -RADIUS..=RADIUS {
                let d2 = (dx * dx + dy * dy) as f32;
                spatial[(dy + RADIUS) as usize][(dx + RADIUS) as usize] = (-d2 / (2.0 * sigma_s * sigma_s)).exp();
            }
        }
        Self {
            spatial,
            inv_two_range_var: 1.0 / (2.0 * sigma_r * sigma_r),
        }
    }

    fn filter_pixel(&self, input: &LinearImageBuffer, x: usize, y: usize) -> [f32; 3] {
        let center = input.pixel(x, y);
        let mut sum = [0.0f32; 3];
        let mut total = 0.0f32;
        for dy in -RADIUS..=RADIUS {
            for dx in -RADIUS..=RADIUS {
                let p = input.pixel_clamped(x as isize + dx, y as isize + dy);
                let dist2 = (p[0] - center[0]).powi(2) + (p[1] - center[1]).powi(2) + (p[2] - center[2]).powi(2);
                let w = self.spatial[(dy + RADIUS) as usize][(dx + RADIUS) as usize]
                    * (-dist2 * self.inv_two_range_var).exp();
                sum[0] += p[0] * w;
                sum[1] += p[1] * w;
                sum[2] += p[2] * w;
                total += w;
            }
        }
        // The center always contributes weight 1.
        [sum[0] / total, sum[1] / total, sum[2] / total]
    }
}

/// Filters every pixel. Strength 0 returns an unchanged copy.
pub fn bilateral_denoise(input: &LinearImageBuffer, strength: f32) -> LinearImageBuffer {
    bilateral_denoise_masked(input, strength, |_, _, _| true)
}

/// Filters only pixels for which `mask(x, y, rgb)` holds; the rest are
/// copied through.
pub fn bilateral_denoise_masked<M>(input: &LinearImageBuffer, strength: f32, mask: M) -> LinearImageBuffer
where
    M: Fn(usize, usize, [f32; 3]) -> bool,
{
    if strength <= 0.0 {
        return input.clone();
    }
    let kernel = Kernel::new(strength);
    let mut out = input.clone();
    for y in 0..input.height() {
        for x in 0..input.width() {
            if mask(x, y, input.pixel(x, y)) {
                out.set_pixel(x, y, kernel.filter_pixel(input, x, y));
            }
        }
    }
    out
}
