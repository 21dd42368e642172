use image::RgbImage;
use tracing::instrument;

use crate::image_pipeline::color::math::lut_texture_coordinate;
use crate::image_pipeline::common::LinearImageBuffer;
use crate::image_pipeline::lut::ColorLookupTable;

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Texel-space position of one channel: lower index, upper index, fraction.
#[inline]
fn axis(c: f32, size: usize) -> (usize, usize, f32) {
    let n = size as f32;
    // normalized texture coordinate back to texel space, centers at integers
    let u = (lut_texture_coordinate(c, size) * n - 0.5).clamp(0.0, n - 1.0);
    let i0 = (u.floor() as usize).min(size - 1);
    let i1 = (i0 + 1).min(size - 1);
    (i0, i1, u - i0 as f32)
}

/// Trilinear LUT sampling and intensity blending.
#[derive(Debug, Clone, Copy, Default)]
pub struct LutEngine;

impl LutEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn sample(&self, lut: &ColorLookupTable, rgb: [f32; 3]) -> [f32; 3] {
        let size = lut.size();
        let (r0, r1, fr) = axis(rgb[0], size);
        let (g0, g1, fg) = axis(rgb[1], size);
        let (b0, b1, fb) = axis(rgb[2], size);

        let c00 = lerp3(lut.at(r0, g0, b0), lut.at(r1, g0, b0), fr);
        let c10 = lerp3(lut.at(r0, g1, b0), lut.at(r1, g1, b0), fr);
        let c01 = lerp3(lut.at(r0, g0, b1), lut.at(r1, g0, b1), fr);
        let c11 = lerp3(lut.at(r0, g1, b1), lut.at(r1, g1, b1), fr);

        let c0 = lerp3(c00, c10, fg);
        let c1 = lerp3(c01, c11, fg);
        lerp3(c0, c1, fb)
    }

    /// `mix(rgb, lut(rgb), intensity)` with intensity clamped to [0, 1].
    pub fn apply_pixel(&self, lut: &ColorLookupTable, rgb: [f32; 3], intensity: f32) -> [f32; 3] {
        let intensity = intensity.clamp(0.0, 1.0);
        if intensity == 0.0 {
            return rgb;
        }
        lerp3(rgb, self.sample(lut, rgb), intensity)
    }

    #[instrument(skip_all, fields(size = lut.size(), intensity))]
    pub fn apply(&self, lut: &ColorLookupTable, input: &LinearImageBuffer, intensity: f32) -> LinearImageBuffer {
        input
            .map_pixels(|rgb| self.apply_pixel(lut, rgb, intensity))
            .clamped()
    }

    /// In-place application on 8-bit encoded pixels.
    pub fn apply_rgb8(&self, lut: &ColorLookupTable, image: &mut RgbImage, intensity: f32) {
        if intensity <= 0.0 {
            return;
        }
        for px in image.pixels_mut() {
            let rgb = px.0.map(|c| c as f32 / 255.0);
            let out = self.apply_pixel(lut, rgb, intensity);
            px.0 = out.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
    }
}
