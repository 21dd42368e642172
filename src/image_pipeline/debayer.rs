//! Debayering module for converting Bayer mosaics to linear RGB

mod ahd;
mod bilinear;
pub mod types;
mod vng;


use tracing::debug;

use crate::image_pipeline::common::{BayerPattern, LinearImageBuffer};

pub use types::{DemosaicMethod, Mosaic};

/// Reconstructs an RGB buffer at full mosaic resolution, clamped to [0, 1].
pub fn demosaic(mosaic: Mosaic<'_>, pattern: BayerPattern, method: DemosaicMethod) -> LinearImageBuffer {
    debug!(
        width = mosaic.width,
        height = mosaic.height,
        ?pattern,
        ?method,
        "Running demosaic"
    );
    let image = match method {
        DemosaicMethod::Bilinear => bilinear::demosaic(mosaic, pattern),
        DemosaicMethod::Vng => vng::demosaic(mosaic, pattern),
        DemosaicMethod::Ahd => ahd::demosaic(mosaic, pattern),
    };
    image.clamped()
}
