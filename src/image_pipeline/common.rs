//! Common utilities module
//!
//! This module contains the error type, the linear image buffer, Bayer
//! geometry and stage timing shared across the image pipeline.

pub mod bayer;
pub mod buffer;
pub mod codec;
pub mod error;
pub mod timing;

pub use bayer::BayerPattern;
pub use buffer::LinearImageBuffer;
pub use codec::{decode_rgb8, encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use error::{DecodeWarning, PipelineError, Result};
pub use timing::{PipelineTimings, StepTiming, Timer};
