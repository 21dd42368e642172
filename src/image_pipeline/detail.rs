//! Detail module: edge-aware denoise, texture protection and sharpening

pub mod bilateral;
pub mod texture;
pub mod unsharp;

#[cfg(test)]
mod tests;

use tracing::instrument;

use crate::image_pipeline::common::LinearImageBuffer;
use crate::image_pipeline::config::DetailParameters;

pub use bilateral::{bilateral_denoise, bilateral_denoise_masked};
pub use texture::{local_luma_variance, protect_texture, TEXTURE_VARIANCE_THRESHOLD};
pub use unsharp::{gaussian_blur, unsharp_mask};

#[derive(Debug, Clone, Copy, Default)]
pub struct DetailEngine;

impl DetailEngine {
    pub fn new() -> Self {
        Self
    }

    /// Denoise, restore texture, then sharpen. Output is clamped to [0, 1].
    #[instrument(skip_all, fields(width = input.width(), height = input.height()))]
    pub fn process(&self, input: &LinearImageBuffer, params: &DetailParameters) -> LinearImageBuffer {
        let denoised = if params.denoise_strength > 0.0 {
            let denoised = bilateral_denoise(input, params.denoise_strength);
            if params.texture_protection > 0.0 {
                protect_texture(input, &denoised, params.texture_protection)
            } else {
                denoised
            }
        } else {
            input.clone()
        };

        let sharpened = if params.sharpen_amount > 0.0 {
            unsharp_mask(
                &denoised,
                params.sharpen_amount,
                params.sharpen_radius,
                params.sharpen_threshold,
            )
        } else {
            denoised
        };

        sharpened.clamped()
    }
}
