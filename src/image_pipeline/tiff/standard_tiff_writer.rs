use std::io::Write;

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{colortype, Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::{LinearImageBuffer, PipelineError, Result};
use crate::image_pipeline::tiff::types::{TiffCompression, TiffConfig};
use crate::image_pipeline::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

fn encoder_compression(compression: TiffCompression) -> Compression {
    match compression {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    }
}

impl TiffWriter for StandardTiffWriter {
    fn write_rgb16(&self, image: &LinearImageBuffer, output: &mut dyn Write, config: &TiffConfig) -> Result<()> {
        debug!("Encoding RGB16 TIFF: {}x{}", image.width(), image.height());

        let samples = image.to_rgb16();
        let mut buffer = Vec::new();

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(encoder_compression(config.compression));

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder
            .write_image::<colortype::RGB16>(image.width() as u32, image.height() as u32, &samples)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete ({} bytes)", buffer.len());
        Ok(())
    }
}
