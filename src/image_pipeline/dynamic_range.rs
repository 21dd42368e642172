//! Dynamic range module
//!
//! Highlight reconstruction, luminance-weighted shadow lift, tiled
//! contrast-limited histogram equalization and exposure-bracket merging.

pub mod clahe;
pub mod hdr_merge;
pub mod highlights;
pub mod shadows;


use tracing::instrument;

use crate::image_pipeline::common::{LinearImageBuffer, Result};
use crate::image_pipeline::config::DynamicRangeParameters;

pub use clahe::{clip_and_redistribute, local_contrast, shift_luma, HISTOGRAM_BINS, TILE_GRID};
pub use hdr_merge::{hdr_weight, merge_exposures, DEFAULT_HDR_SIGMA};
pub use highlights::{recover_highlights, recover_pixel, CLIP_THRESHOLD};
pub use shadows::{lift_shadows, shadow_weight, SHADOW_THRESHOLD};

#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicRangeEngine;

impl DynamicRangeEngine {
    pub fn new() -> Self {
        Self
    }

    /// Highlights, then shadows, then local contrast. Output is clamped.
    #[instrument(skip_all, fields(width = input.width(), height = input.height()))]
    pub fn process(&self, input: &LinearImageBuffer, params: &DynamicRangeParameters) -> LinearImageBuffer {
        let mut image = if params.highlight_recovery > 0.0 {
            recover_highlights(input, params.highlight_recovery)
        } else {
            input.clone()
        };

        if params.shadow_lift > 0.0 {
            image = lift_shadows(&image, params.shadow_lift, params.noise_reduction);
        }

        if params.local_contrast > 0.0 {
            image = local_contrast(&image, params.local_contrast, params.clip_limit);
        }

        image.clamped()
    }

    /// Merges bracketed frames with the default weighting sigma.
    pub fn merge(&self, frames: &[LinearImageBuffer], exposure_factors: &[f32]) -> Result<LinearImageBuffer> {
        merge_exposures(frames, exposure_factors, DEFAULT_HDR_SIGMA)
    }
}
