//! Exposure-bracket merge

use tracing::debug;

use crate::image_pipeline::color::math::luminance;
use crate::image_pipeline::common::{LinearImageBuffer, PipelineError, Result};

pub const DEFAULT_HDR_SIGMA: f32 = 0.2;

/// Well-exposedness weight, a Gaussian centered on mid luma.
#[inline]
pub fn hdr_weight(luma: f32, sigma: f32) -> f32 {
    let d = luma - 0.5;
    (-(d * d) / (2.0 * sigma * sigma)).exp()
}

fn stage_error(message: impl Into<String>) -> PipelineError {
    PipelineError::StageError {
        stage: "hdr_merge",
        message: message.into(),
    }
}

/// Merges `frames` shot at relative `exposure_factors`.
///
/// Each frame's weight is [`hdr_weight`] of its luma divided by its
/// exposure factor; the result is `Σ(pixel · factor · w) / Σw`, clamped.
/// One frame is returned as an unchanged copy.
pub fn merge_exposures(
    frames: &[LinearImageBuffer],
    exposure_factors: &[f32],
    sigma: f32,
) -> Result<LinearImageBuffer> {
    let first = frames.first().ok_or_else(|| stage_error("no frames to merge"))?;
    if frames.len() != exposure_factors.len() {
        return Err(stage_error(format!(
            "{} frames but {} exposure factors",
            frames.len(),
            exposure_factors.len()
        )));
    }
    if let Some(bad) = frames.iter().find(|f| !f.same_dimensions(first)) {
        return Err(PipelineError::InvalidDimensions(bad.width(), bad.height()));
    }
    if exposure_factors.iter().any(|&f| !f.is_finite() || f <= 0.0) {
        return Err(stage_error("exposure factors must be positive"));
    }
    if frames.len() == 1 {
        return Ok(first.clone());
    }

    debug!(frames = frames.len(), sigma, "merging exposure bracket");

    let sigma = sigma.max(1e-3);
    let pixel_count = first.pixel_count();
    let mut data = vec![0.0f32; pixel_count * 3];

    for (i, out) in data.chunks_exact_mut(3).enumerate() {
        let mut sum = [0.0f32; 3];
        let mut total = 0.0f32;
        for (frame, &factor) in frames.iter().zip(exposure_factors) {
            let px = &frame.data()[i * 3..i * 3 + 3];
            let rgb = [px[0], px[1], px[2]];
            let w = hdr_weight(luminance(rgb), sigma) / factor;
            for c in 0..3 {
                sum[c] += rgb[c] * factor * w;
            }
            total += w;
        }
        if total > 0.0 {
            for c in 0..3 {
                out[c] = (sum[c] / total).clamp(0.0, 1.0);
            }
        }
    }

    LinearImageBuffer::from_data(first.width(), first.height(), data)
}
