//! Encoded-image helpers shared by the RAW and still paths

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};

use crate::image_pipeline::common::error::{PipelineError, Result};

pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Decodes any format the `image` crate was built with into 8-bit RGB.
pub fn decode_rgb8(bytes: &[u8]) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PipelineError::DecodeError(format!("encoded still: {}", e)))?;
    Ok(decoded.to_rgb8())
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    let mut encoder = JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100));
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| PipelineError::EncodeError(format!("JPEG encoding failed: {}", e)))?;

    Ok(buffer)
}
