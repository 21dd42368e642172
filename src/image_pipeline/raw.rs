//! RAW sensor frame decoding module
//!
//! Unpacks bit-packed mosaic payloads, corrects black/white levels, repairs
//! hot and dead pixels and hands the normalized mosaic to the demosaic
//! stage.

mod decoder;
mod levels;
mod rawloader_reader;
mod reader;
pub mod types;
mod unpack;


pub use decoder::{DecodeOutput, RawDecoder};
pub use levels::{correct_levels, repair_bad_pixels, BAD_PIXEL_THRESHOLD};
pub use rawloader_reader::RawLoaderReader;
pub use reader::RawFrameReader;
pub use types::{BitDepth, CapturePath, RawCaptureSupport, RawFrame};
pub use unpack::{pack_raw10, pack_raw12, unpack_samples};
