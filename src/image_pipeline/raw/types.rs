//! RAW frame types

use crate::image_pipeline::common::{BayerPattern, DecodeWarning};

/// Sample packing of a RAW payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// 4 pixels in 5 bytes
    Ten,
    /// 2 pixels in 3 bytes
    Twelve,
    /// 16-bit little-endian containers rescaled to the 14-bit range
    Fourteen,
    /// 16-bit little-endian words
    Sixteen,
}

impl BitDepth {
    /// Maps a declared bit depth to a packing. Unknown depths fall back to
    /// 16-bit with a warning.
    pub fn resolve(bits: u8) -> (Self, Option<DecodeWarning>) {
        match bits {
            10 => (BitDepth::Ten, None),
            12 => (BitDepth::Twelve, None),
            14 => (BitDepth::Fourteen, None),
            16 => (BitDepth::Sixteen, None),
            other => (BitDepth::Sixteen, Some(DecodeWarning::UnsupportedBitDepth(other))),
        }
    }

    /// Number of payload bytes needed for `pixels` samples, `None` on
    /// overflow.
    pub fn bytes_required(self, pixels: usize) -> Option<usize> {
        match self {
            BitDepth::Ten => pixels.div_ceil(4).checked_mul(5),
            BitDepth::Twelve => pixels.div_ceil(2).checked_mul(3),
            BitDepth::Fourteen | BitDepth::Sixteen => pixels.checked_mul(2),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            BitDepth::Ten => 10,
            BitDepth::Twelve => 12,
            BitDepth::Fourteen => 14,
            BitDepth::Sixteen => 16,
        }
    }
}

/// A single RAW capture as delivered by the capture collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Packed sensor payload
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub pattern: BayerPattern,
    /// Declared bit depth (10, 12, 14 or 16)
    pub bit_depth: u8,
    /// Black levels in `[R, Gr, Gb, B]` order
    pub black_levels: [u16; 4],
    pub white_level: u16,
}

impl RawFrame {
    pub fn mean_black_level(&self) -> f32 {
        self.black_levels.iter().map(|&b| b as f32).sum::<f32>() / 4.0
    }
}

/// Whether the device can deliver RAW frames at all.
///
/// This is a capability answer, not an error: devices without RAW capture
/// still produce encoded stills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCaptureSupport {
    Available,
    Unavailable { reason: String },
}

/// Which processing path a capture goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePath {
    /// Full RAW pipeline via the orchestrator
    Raw,
    /// Reduced path via the processing queue
    EncodedStill,
}

impl CapturePath {
    pub fn for_support(support: &RawCaptureSupport) -> Self {
        match support {
            RawCaptureSupport::Available => CapturePath::Raw,
            RawCaptureSupport::Unavailable { .. } => CapturePath::EncodedStill,
        }
    }
}
