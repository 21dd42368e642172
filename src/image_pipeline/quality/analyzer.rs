use tracing::{debug, instrument};

use crate::image_pipeline::color::math::luminance;
use crate::image_pipeline::common::LinearImageBuffer;
use crate::image_pipeline::quality::types::{
    DynamicRangeAnalysis, ExposureAnalysis, NoiseAnalysis, QualityReport, SharpnessAnalysis,
};

const OVEREXPOSED_LEVEL: f32 = 250.0 / 255.0;
const UNDEREXPOSED_LEVEL: f32 = 5.0 / 255.0;
const CLIPPED_PERCENT_LIMIT: f32 = 10.0;
const DARK_MEAN: f32 = 0.2;
const BRIGHT_MEAN: f32 = 0.8;
const TARGET_MEAN: f32 = 0.45;

const HISTOGRAM_TRIM: f64 = 0.001;

// sigma at which the noise score reaches zero (about 13 8-bit levels)
const NOISE_FLOOR_SIGMA: f32 = 0.05;
const SHARP_VARIANCE: f32 = 0.002;
const EDGE_RESPONSE: f32 = 0.1;
const SHARP_EDGE_DENSITY: f32 = 0.1;

const EXPOSURE_WEIGHT: f32 = 0.3;
const RANGE_WEIGHT: f32 = 0.25;
const NOISE_WEIGHT: f32 = 0.2;
const SHARPNESS_WEIGHT: f32 = 0.25;

fn luma_plane(image: &LinearImageBuffer) -> Vec<f32> {
    image
        .pixels()
        .map(|px| luminance([px[0], px[1], px[2]]).clamp(0.0, 1.0))
        .collect()
}

/// Pure scoring of a final, display-encoded image.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityAnalyzer;

impl QualityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn analyze(&self, image: &LinearImageBuffer) -> QualityReport {
        let luma = luma_plane(image);
        let exposure = self.exposure(image, &luma);
        let dynamic_range = self.dynamic_range(&luma);
        let noise = self.noise(&luma, image.width(), image.height());
        let sharpness = self.sharpness(&luma, image.width(), image.height());

        let overall_score = (EXPOSURE_WEIGHT * exposure.score
            + RANGE_WEIGHT * dynamic_range.score
            + NOISE_WEIGHT * noise.score
            + SHARPNESS_WEIGHT * sharpness.score)
            .clamp(0.0, 100.0);

        debug!(
            exposure = exposure.score,
            range = dynamic_range.score,
            noise = noise.score,
            sharpness = sharpness.score,
            overall = overall_score,
            "quality scored"
        );

        QualityReport {
            exposure,
            dynamic_range,
            noise,
            sharpness,
            overall_score,
        }
    }

    fn exposure(&self, image: &LinearImageBuffer, luma: &[f32]) -> ExposureAnalysis {
        let count = image.pixel_count().max(1) as f32;
        let mut over = 0usize;
        let mut under = 0usize;
        for px in image.pixels() {
            let max = px[0].max(px[1]).max(px[2]);
            if max >= OVEREXPOSED_LEVEL {
                over += 1;
            } else if max <= UNDEREXPOSED_LEVEL {
                under += 1;
            }
        }

        let mean_brightness = luma.iter().sum::<f32>() / count;
        let overexposed_percent = over as f32 / count * 100.0;
        let underexposed_percent = under as f32 / count * 100.0;

        let score = (100.0
            - (mean_brightness - TARGET_MEAN).abs() * 200.0
            - (overexposed_percent + underexposed_percent))
            .clamp(0.0, 100.0);

        ExposureAnalysis {
            mean_brightness,
            overexposed_percent,
            underexposed_percent,
            is_overexposed: overexposed_percent > CLIPPED_PERCENT_LIMIT || mean_brightness > BRIGHT_MEAN,
            is_underexposed: underexposed_percent > CLIPPED_PERCENT_LIMIT || mean_brightness < DARK_MEAN,
            score,
        }
    }

    fn dynamic_range(&self, luma: &[f32]) -> DynamicRangeAnalysis {
        let mut hist = [0usize; 256];
        for &l in luma {
            hist[(l * 255.0).round() as usize] += 1;
        }
        let threshold = luma.len() as f64 * HISTOGRAM_TRIM;
        let significant = |&(_, &count): &(usize, &usize)| count > 0 && count as f64 >= threshold;

        let low = hist.iter().enumerate().find(significant).map(|(i, _)| i);
        let high = hist.iter().enumerate().rev().find(significant).map(|(i, _)| i);

        let (low, high) = match (low, high) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0, 0),
        };
        let utilization = (high - low) as f32 / 255.0;
        DynamicRangeAnalysis {
            low: low as u8,
            high: high as u8,
            utilization,
            score: utilization * 100.0,
        }
    }

    /// Immerkær's fast noise variance estimate.
    fn noise(&self, luma: &[f32], width: usize, height: usize) -> NoiseAnalysis {
        if width < 3 || height < 3 {
            return NoiseAnalysis { sigma: 0.0, score: 100.0 };
        }
        let at = |x: usize, y: usize| luma[y * width + x];
        let mut sum = 0.0f64;
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let v = at(x - 1, y - 1) - 2.0 * at(x, y - 1) + at(x + 1, y - 1)
                    - 2.0 * at(x - 1, y)
                    + 4.0 * at(x, y)
                    - 2.0 * at(x + 1, y)
                    + at(x - 1, y + 1)
                    - 2.0 * at(x, y + 1)
                    + at(x + 1, y + 1);
                sum += v.abs() as f64;
            }
        }
        let interior = ((width - 2) * (height - 2)) as f64;
        let sigma = (sum * (std::f64::consts::PI / 2.0).sqrt() / (6.0 * interior)) as f32;
        NoiseAnalysis {
            sigma,
            score: (100.0 * (1.0 - sigma / NOISE_FLOOR_SIGMA)).clamp(0.0, 100.0),
        }
    }

    fn sharpness(&self, luma: &[f32], width: usize, height: usize) -> SharpnessAnalysis {
        if width < 3 || height < 3 {
            return SharpnessAnalysis {
                laplacian_variance: 0.0,
                edge_density: 0.0,
                score: 0.0,
            };
        }
        let at = |x: usize, y: usize| luma[y * width + x];
        let mut responses = Vec::with_capacity((width - 2) * (height - 2));
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                responses.push(at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1) - 4.0 * at(x, y));
            }
        }

        let n = responses.len() as f32;
        let mean = responses.iter().sum::<f32>() / n;
        let laplacian_variance = responses.iter().map(|r| (r - mean).powi(2)).sum::<f32>() / n;
        let edge_density = responses.iter().filter(|r| r.abs() > EDGE_RESPONSE).count() as f32 / n;

        let variance_part = (laplacian_variance / SHARP_VARIANCE).min(1.0);
        let density_part = (edge_density / SHARP_EDGE_DENSITY).min(1.0);
        SharpnessAnalysis {
            laplacian_variance,
            edge_density,
            score: (70.0 * variance_part + 30.0 * density_part).clamp(0.0, 100.0),
        }
    }
}
