use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawFrame;

/// Source of RAW frames from an encoded container (DNG, ARW, ...).
pub trait RawFrameReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawFrame>;
}
