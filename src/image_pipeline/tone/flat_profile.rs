use tracing::instrument;

use crate::image_pipeline::common::LinearImageBuffer;

/// Chroma kept relative to luminance.
pub const FLAT_SATURATION: f32 = 0.45;
/// Contrast scale for a 0.35 contrast reduction.
pub const FLAT_CONTRAST_SCALE: f32 = 0.85;
/// 0.25 x 50 levels of an 8-bit range.
pub const FLAT_SHADOW_LIFT: f32 = 12.5 / 255.0;

// Android-style saturation matrix weights (Rec.709).
const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Low-contrast grading master.
///
/// Saturation, contrast and shadow lift are composed once into a single
/// 3x4 affine matrix (`rgb' = M * [r, g, b, 1]`).
#[derive(Debug, Clone, Copy)]
pub struct FlatProfileGenerator {
    matrix: [[f32; 4]; 3],
}

impl Default for FlatProfileGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatProfileGenerator {
    pub fn new() -> Self {
        let s = FLAT_SATURATION;
        let k = FLAT_CONTRAST_SCALE;
        // contrast pivots on 127.5 of 255
        let offset = (1.0 - k) * 0.5 + FLAT_SHADOW_LIFT;

        let mut matrix = [[0.0f32; 4]; 3];
        for (i, row) in matrix.iter_mut().enumerate() {
            for (j, w) in LUMA_WEIGHTS.iter().enumerate() {
                let sat = (1.0 - s) * w + if i == j { s } else { 0.0 };
                row[j] = k * sat;
            }
            row[3] = offset;
        }
        Self { matrix }
    }

    pub fn matrix(&self) -> &[[f32; 4]; 3] {
        &self.matrix
    }

    #[inline]
    pub fn apply_pixel(&self, rgb: [f32; 3]) -> [f32; 3] {
        let m = &self.matrix;
        let row = |r: &[f32; 4]| (r[0] * rgb[0] + r[1] * rgb[1] + r[2] * rgb[2] + r[3]).clamp(0.0, 1.0);
        [row(&m[0]), row(&m[1]), row(&m[2])]
    }

    #[instrument(skip_all, fields(width = input.width(), height = input.height()))]
    pub fn apply(&self, input: &LinearImageBuffer) -> LinearImageBuffer {
        input.map_pixels(|rgb| self.apply_pixel(rgb))
    }
}
