//! Color-palette adjustment for already encoded stills.
//!
//! The pixel buffer is split into one contiguous, pixel-aligned slice per
//! rayon worker; each task touches only its own slice and `for_each`
//! returns once every slice is done.

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const WARMTH_LEVELS: f32 = 25.0;

/// Brightness, contrast, saturation and warmth for 8-bit stills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    /// Brightness adjustment (-1.0 to 1.0, 0.0 = no change)
    pub brightness: f32,
    /// Contrast adjustment (0.0 to 2.0, 1.0 = no change)
    pub contrast: f32,
    /// Saturation adjustment (0.0 to 2.0, 1.0 = no change)
    pub saturation: f32,
    /// Warm/cool shift (-1.0 to 1.0, 0.0 = no change)
    pub warmth: f32,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            warmth: 0.0,
        }
    }
}

impl ColorPalette {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_pixel(&self, px: [u8; 3]) -> [u8; 3] {
        let shift = self.brightness * 255.0;
        let warm = self.warmth * WARMTH_LEVELS;
        let [r, g, b] = px.map(|c| c as f32 + shift);
        let r = r + warm;
        let b = b - warm;

        let contrast = |c: f32| ((c - 128.0) * self.contrast + 128.0).clamp(0.0, 255.0);
        let (r, g, b) = (contrast(r), contrast(g), contrast(b));

        let (r, g, b) = if self.saturation != 1.0 {
            let gray = 0.299 * r + 0.587 * g + 0.114 * b;
            let sat = |c: f32| (gray + (c - gray) * self.saturation).clamp(0.0, 255.0);
            (sat(r), sat(g), sat(b))
        } else {
            (r, g, b)
        };

        [r.round() as u8, g.round() as u8, b.round() as u8]
    }

    /// Adjusts `image` in place across all rayon threads.
    pub fn apply(&self, image: &mut RgbImage) {
        if self.is_identity() {
            return;
        }
        let buffer: &mut [u8] = image;
        let pixels = buffer.len() / 3;
        if pixels == 0 {
            return;
        }
        let per_task = pixels.div_ceil(rayon::current_num_threads().max(1));

        buffer.par_chunks_mut(per_task * 3).for_each(|slice| {
            for px in slice.chunks_exact_mut(3) {
                let out = self.apply_pixel([px[0], px[1], px[2]]);
                px.copy_from_slice(&out);
            }
        });
    }
}
