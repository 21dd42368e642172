use std::sync::Arc;

use image::RgbImage;

use tracing::{debug, info_span, instrument};

use crate::image_pipeline::common::{decode_rgb8, encode_jpeg, PipelineError, Result, DEFAULT_JPEG_QUALITY};
use crate::image_pipeline::config::LookParameters;
use crate::image_pipeline::conversions::palette::ColorPalette;
use crate::image_pipeline::conversions::watermark::{NoWatermark, Watermark, WatermarkPosition};
use crate::image_pipeline::lut::{LutCache, LutEngine};

/// Effects requested for one encoded still.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StillEdit {
    pub palette: ColorPalette,
    pub look: LookParameters,
    /// `None` disables the watermark
    pub watermark: Option<WatermarkPosition>,
}

impl StillEdit {
    pub fn has_look(&self) -> bool {
        self.look.lut_id.is_some() && self.look.intensity > 0.0
    }

    pub fn has_effects(&self) -> bool {
        !self.palette.is_identity() || self.has_look() || self.watermark.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StillOutcome {
    /// Re-encoded JPEG bytes
    Processed(Vec<u8>),
    /// Nothing was requested; the caller keeps its original bytes
    Unchanged,
}

/// Reduced path for stills that arrive already encoded:
/// decode, palette, LUT, watermark, JPEG encode.
pub struct StillProcessor {
    luts: Option<Arc<LutCache>>,
    watermark: Arc<dyn Watermark>,
    jpeg_quality: u8,
    lut_engine: LutEngine,
}

impl Default for StillProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl StillProcessor {
    pub fn new() -> Self {
        Self {
            luts: None,
            watermark: Arc::new(NoWatermark),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            lut_engine: LutEngine::new(),
        }
    }

    pub fn with_lut_cache(mut self, luts: Arc<LutCache>) -> Self {
        self.luts = Some(luts);
        self
    }

    pub fn with_watermark(mut self, watermark: Arc<dyn Watermark>) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    #[instrument(skip_all, fields(input_size = bytes.len()))]
    pub fn process(&self, bytes: &[u8], edit: &StillEdit) -> Result<StillOutcome> {
        let image = {
            let _span = info_span!("decode_still").entered();
            decode_rgb8(bytes)?
        };

        if !edit.has_effects() {
            debug!("No effects requested, keeping original bytes");
            return Ok(StillOutcome::Unchanged);
        }

        self.finish(image, edit).map(StillOutcome::Processed)
    }

    /// Applies palette, look and watermark to a decoded image and encodes
    /// it as JPEG.
    pub fn finish(&self, mut image: RgbImage, edit: &StillEdit) -> Result<Vec<u8>> {
        if !edit.palette.is_identity() {
            let _span = info_span!("color_palette").entered();
            edit.palette.apply(&mut image);
        }

        if let (true, Some(id)) = (edit.has_look(), edit.look.lut_id.as_deref()) {
            let _span = info_span!("apply_lut", id).entered();
            let luts = self
                .luts
                .as_ref()
                .ok_or_else(|| PipelineError::LutError(format!("no LUT source for '{}'", id)))?;
            let table = luts.get(id)?;
            self.lut_engine.apply_rgb8(&table, &mut image, edit.look.intensity);
        }

        if let Some(position) = edit.watermark {
            let _span = info_span!("watermark").entered();
            image = self.watermark.apply(image, position)?;
        }

        let _span = info_span!("encode_jpeg").entered();
        encode_jpeg(&image, self.jpeg_quality)
    }
}
