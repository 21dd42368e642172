use tracing::{debug, instrument, warn};

use crate::image_pipeline::common::{DecodeWarning, LinearImageBuffer, PipelineError, Result};
use crate::image_pipeline::debayer::{self, DemosaicMethod, Mosaic};
use crate::image_pipeline::raw::levels::{correct_levels, repair_bad_pixels};
use crate::image_pipeline::raw::types::{BitDepth, RawFrame};
use crate::image_pipeline::raw::unpack::unpack_samples;

/// Smallest frame side that still holds a complete Bayer tile.
const MIN_DIMENSION: usize = 2;

/// Decoded frame plus the non-fatal conditions met on the way.
#[derive(Debug, Clone)]
pub struct DecodeOutput {
    pub image: LinearImageBuffer,
    pub warnings: Vec<DecodeWarning>,
    /// Sites replaced by bad-pixel repair
    pub repaired_pixels: usize,
}

/// Turns a packed RAW frame into a linear RGB buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder {
    method: DemosaicMethod,
}

impl RawDecoder {
    pub fn new(method: DemosaicMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> DemosaicMethod {
        self.method
    }

    /// Checks the header and returns the pixel count.
    fn validate(frame: &RawFrame) -> Result<usize> {
        if frame.width < MIN_DIMENSION || frame.height < MIN_DIMENSION {
            return Err(PipelineError::InvalidDimensions(frame.width, frame.height));
        }
        frame
            .width
            .checked_mul(frame.height)
            .and_then(|pixels| pixels.checked_mul(3).map(|_| pixels))
            .ok_or(PipelineError::InvalidDimensions(frame.width, frame.height))
    }

    /// Unpacks, level-corrects and repairs the mosaic without demosaicing.
    /// Values are normalized to [0, 1].
    pub fn normalized_mosaic(&self, frame: &RawFrame) -> Result<(Vec<f32>, Vec<DecodeWarning>, usize)> {
        let pixels = Self::validate(frame)?;

        let mut warnings = Vec::new();
        let (depth, warning) = BitDepth::resolve(frame.bit_depth);
        if let Some(w) = warning {
            warn!("{}", w);
            warnings.push(w);
        }

        let samples = unpack_samples(&frame.data, pixels, depth)?;
        let leveled = correct_levels(
            &samples,
            frame.width,
            frame.height,
            frame.pattern,
            frame.black_levels,
            frame.white_level,
        )?;
        let (repaired, count) = repair_bad_pixels(&leveled, frame.width, frame.height);
        if count > 0 {
            debug!(count, "Repaired bad pixels");
        }
        Ok((repaired, warnings, count))
    }

    #[instrument(skip(self, frame), fields(width = frame.width, height = frame.height, bits = frame.bit_depth))]
    pub fn decode(&self, frame: &RawFrame) -> Result<DecodeOutput> {
        let (mosaic, warnings, repaired_pixels) = self.normalized_mosaic(frame)?;
        let image = debayer::demosaic(
            Mosaic {
                data: &mosaic,
                width: frame.width,
                height: frame.height,
            },
            frame.pattern,
            self.method,
        );
        Ok(DecodeOutput {
            image,
            warnings,
            repaired_pixels,
        })
    }
}
