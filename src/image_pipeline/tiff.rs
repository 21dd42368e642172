//! TIFF writing module
//!
//! Writes the minimally processed 16-bit RGB master with configurable
//! compression.

mod standard_tiff_writer;
pub mod types;
mod writer;

#[cfg(test)]
mod tests;

pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{TiffCompression, TiffConfig, TiffConfigBuilder};
pub use writer::TiffWriter;
