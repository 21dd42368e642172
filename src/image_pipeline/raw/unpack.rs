//! Bit-level unpacking of sensor payloads.
//!
//! Packed streams are contiguous over the whole frame with no row padding.

use crate::image_pipeline::common::{PipelineError, Result};
use crate::image_pipeline::raw::types::BitDepth;

const FOURTEEN_BIT_SCALE: f32 = 16383.0 / 65535.0;

/// Expands a packed payload into one float sample per pixel, in sensor DN.
pub fn unpack_samples(data: &[u8], pixels: usize, depth: BitDepth) -> Result<Vec<f32>> {
    let required = depth.bytes_required(pixels).ok_or_else(|| {
        PipelineError::DecodeError(format!("{} {}-bit samples overflow the payload size", pixels, depth.bits()))
    })?;
    if data.len() < required {
        return Err(PipelineError::DecodeError(format!(
            "payload too small for {} {}-bit samples: expected {} bytes, got {}",
            pixels,
            depth.bits(),
            required,
            data.len()
        )));
    }

    let mut samples = Vec::with_capacity(pixels);
    match depth {
        BitDepth::Ten => {
            for group in data[..required].chunks_exact(5) {
                let low = group[4] as u16;
                for i in 0..4 {
                    let value = ((group[i] as u16) << 2) | ((low >> (2 * i)) & 0x3);
                    samples.push(value as f32);
                }
            }
        }
        BitDepth::Twelve => {
            for group in data[..required].chunks_exact(3) {
                let low = group[2] as u16;
                samples.push((((group[0] as u16) << 4) | (low & 0xF)) as f32);
                samples.push((((group[1] as u16) << 4) | (low >> 4)) as f32);
            }
        }
        BitDepth::Fourteen => {
            for word in data[..required].chunks_exact(2) {
                let value = u16::from_le_bytes([word[0], word[1]]);
                samples.push(value as f32 * FOURTEEN_BIT_SCALE);
            }
        }
        BitDepth::Sixteen => {
            for word in data[..required].chunks_exact(2) {
                samples.push(u16::from_le_bytes([word[0], word[1]]) as f32);
            }
        }
    }

    // Groups may carry padding samples past the last pixel.
    samples.truncate(pixels);
    Ok(samples)
}

/// Packs 10-bit samples into the 4-pixels-per-5-bytes layout.
pub fn pack_raw10(samples: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len().div_ceil(4) * 5);
    for group in samples.chunks(4) {
        let mut low = 0u8;
        for i in 0..4 {
            let v = group.get(i).copied().unwrap_or(0) & 0x3FF;
            out.push((v >> 2) as u8);
            low |= ((v & 0x3) as u8) << (2 * i);
        }
        out.push(low);
    }
    out
}

/// Packs 12-bit samples into the 2-pixels-per-3-bytes layout.
pub fn pack_raw12(samples: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len().div_ceil(2) * 3);
    for pair in samples.chunks(2) {
        let a = pair[0] & 0xFFF;
        let b = pair.get(1).copied().unwrap_or(0) & 0xFFF;
        out.push((a >> 4) as u8);
        out.push((b >> 4) as u8);
        out.push(((a & 0xF) | ((b & 0xF) << 4)) as u8);
    }
    out
}
