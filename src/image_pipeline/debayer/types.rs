//! Types for debayering operations

use serde::{Deserialize, Serialize};

/// Interpolation used to rebuild full RGB from the mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemosaicMethod {
    /// Neighbor averaging with the standard direct/cross/diagonal stencils
    #[default]
    Bilinear,
    /// Variable number of gradients, eight directions at stride 2
    Vng,
    /// Simplified adaptive homogeneity-directed green interpolation
    Ahd,
}

/// Read-only view over a normalized single-channel mosaic.
#[derive(Debug, Clone, Copy)]
pub struct Mosaic<'a> {
    pub data: &'a [f32],
    pub width: usize,
    pub height: usize,
}

impl Mosaic<'_> {
    /// Sample with reflect-101 borders, which keep the Bayer parity.
    #[inline]
    pub fn at(&self, x: isize, y: isize) -> f32 {
        let x = reflect(x, self.width);
        let y = reflect(y, self.height);
        self.data[y * self.width + x]
    }
}

#[inline]
pub(crate) fn reflect(i: isize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let m = i.rem_euclid(period);
    if m >= n as isize {
        (period - m) as usize
    } else {
        m as usize
    }
}
