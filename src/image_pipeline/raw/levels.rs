//! Black/white level correction and bad-pixel repair on the mosaic.

use crate::image_pipeline::common::bayer::bayer_phase;
use crate::image_pipeline::common::{BayerPattern, PipelineError, Result};

/// Absolute deviation from the same-color median above which a site is
/// treated as hot or dead.
pub const BAD_PIXEL_THRESHOLD: f32 = 0.3;

/// Subtracts the per-phase black level and normalizes by
/// `white_level - mean_black_level`, clamping to [0, 1].
pub fn correct_levels(
    samples: &[f32],
    width: usize,
    height: usize,
    pattern: BayerPattern,
    black_levels: [u16; 4],
    white_level: u16,
) -> Result<Vec<f32>> {
    let mean_black = black_levels.iter().map(|&b| b as f32).sum::<f32>() / 4.0;
    let range = white_level as f32 - mean_black;
    if range <= 0.0 {
        return Err(PipelineError::DecodeError(format!(
            "white level {} does not exceed mean black level {:.1}",
            white_level, mean_black
        )));
    }

    if width.checked_mul(height).is_none_or(|pixels| samples.len() < pixels) {
        return Err(PipelineError::DecodeError(format!(
            "{} samples do not cover a {}x{} mosaic",
            samples.len(),
            width,
            height
        )));
    }

    let phase_black = [0, 1, 2, 3].map(|phase| black_levels[pattern.black_level_index(phase)] as f32);

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let v = samples[y * width + x];
            let black = phase_black[bayer_phase(x, y)];
            out.push(((v - black) / range).clamp(0.0, 1.0));
        }
    }
    Ok(out)
}

/// Replaces sites that deviate from the median of their four same-color
/// neighbors (two pixels away on each axis) by more than
/// [`BAD_PIXEL_THRESHOLD`].
///
/// Neighbors outside the frame are skipped; a site with no same-color
/// neighbors is left alone.
pub fn repair_bad_pixels(mosaic: &[f32], width: usize, height: usize) -> (Vec<f32>, usize) {
    let mut out = mosaic.to_vec();
    let mut repaired = 0;

    for y in 0..height {
        for x in 0..width {
            let mut neighbors = [0.0f32; 4];
            let mut count = 0;
            let candidates = [
                (x.checked_sub(2), Some(y)),
                (Some(x + 2).filter(|&nx| nx < width), Some(y)),
                (Some(x), y.checked_sub(2)),
                (Some(x), Some(y + 2).filter(|&ny| ny < height)),
            ];
            for (nx, ny) in candidates {
                if let (Some(nx), Some(ny)) = (nx, ny) {
                    neighbors[count] = mosaic[ny * width + nx];
                    count += 1;
                }
            }
            if count == 0 {
                continue;
            }

            let median = median_of(&mut neighbors[..count]);
            let v = mosaic[y * width + x];
            if (v - median).abs() > BAD_PIXEL_THRESHOLD {
                out[y * width + x] = median;
                repaired += 1;
            }
        }
    }

    (out, repaired)
}

fn median_of(values: &mut [f32]) -> f32 {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) * 0.5
    }
}
