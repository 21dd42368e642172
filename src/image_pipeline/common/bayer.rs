//! Bayer color-filter geometry.

use serde::{Deserialize, Serialize};

/// Color of a single mosaic site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaColor {
    Red,
    Green,
    Blue,
}

impl CfaColor {
    /// Channel index in an interleaved RGB buffer.
    pub fn channel(self) -> usize {
        match self {
            CfaColor::Red => 0,
            CfaColor::Green => 1,
            CfaColor::Blue => 2,
        }
    }
}

/// Sensor mosaic layout, named by the colors of the top-left 2x2 tile
/// read row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BayerPattern {
    #[default]
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

/// Phase of a pixel inside its 2x2 tile: `(y % 2) * 2 + (x % 2)`.
///
/// Every stage that needs the mosaic position goes through this function.
#[inline]
pub fn bayer_phase(x: usize, y: usize) -> usize {
    (y % 2) * 2 + (x % 2)
}

impl BayerPattern {
    fn tile(self) -> [CfaColor; 4] {
        use CfaColor::*;
        match self {
            BayerPattern::Rggb => [Red, Green, Green, Blue],
            BayerPattern::Bggr => [Blue, Green, Green, Red],
            BayerPattern::Grbg => [Green, Red, Blue, Green],
            BayerPattern::Gbrg => [Green, Blue, Red, Green],
        }
    }

    /// Color of the filter covering pixel `(x, y)`.
    #[inline]
    pub fn color_at(self, x: usize, y: usize) -> CfaColor {
        self.tile()[bayer_phase(x, y)]
    }

    /// Color of the filter at a given phase.
    #[inline]
    pub fn color_at_phase(self, phase: usize) -> CfaColor {
        self.tile()[phase & 3]
    }

    /// Index into a `[R, Gr, Gb, B]` black-level array for a phase.
    ///
    /// Gr is the green site sharing a row with red, Gb the one sharing a
    /// row with blue.
    pub fn black_level_index(self, phase: usize) -> usize {
        let phase = phase & 3;
        match self.color_at_phase(phase) {
            CfaColor::Red => 0,
            CfaColor::Blue => 3,
            CfaColor::Green => {
                // The other site on this row decides which green it is.
                let row_mate = phase ^ 1;
                if self.color_at_phase(row_mate) == CfaColor::Red {
                    1
                } else {
                    2
                }
            }
        }
    }

    /// Builds a pattern from the colors of the top-left 2x2 tile.
    pub fn from_tile(tile: [CfaColor; 4]) -> Option<Self> {
        [
            BayerPattern::Rggb,
            BayerPattern::Bggr,
            BayerPattern::Grbg,
            BayerPattern::Gbrg,
        ]
        .into_iter()
        .find(|p| p.tile() == tile)
    }
}
