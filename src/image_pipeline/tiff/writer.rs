use std::io::Write;

use crate::image_pipeline::common::{LinearImageBuffer, Result};
use crate::image_pipeline::tiff::types::TiffConfig;

pub trait TiffWriter {
    /// Writes `image` as 16-bit interleaved RGB. Values are clamped to [0, 1].
    fn write_rgb16(&self, image: &LinearImageBuffer, output: &mut dyn Write, config: &TiffConfig) -> Result<()>;
}
