//! RAW file reader implementation using the rawloader library.
//!
//! Decodes camera RAW containers into a [`RawFrame`] carrying a 16-bit
//! little-endian payload, so the frame goes through the same unpack and
//! level-correction path as frames delivered directly by the sensor.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::debug;

use crate::image_pipeline::common::bayer::CfaColor;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::BayerPattern;
use crate::image_pipeline::raw::reader::RawFrameReader;
use crate::image_pipeline::raw::types::RawFrame;

/// RAW frame reader that uses the rawloader library for decoding.
///
/// Supports any single-plane Bayer format rawloader can decode (ARW, DNG,
/// NEF, CR2, RAF, ...).
pub struct RawLoaderReader;

impl RawLoaderReader {
    fn cfa_color(index: usize) -> Option<CfaColor> {
        match index {
            0 => Some(CfaColor::Red),
            1 | 3 => Some(CfaColor::Green),
            2 => Some(CfaColor::Blue),
            _ => None,
        }
    }
}

impl RawFrameReader for RawLoaderReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawFrame> {
        debug!("Decoding RAW container, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        if decoded.cpp != 1 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{} components per pixel, expected a single-plane mosaic",
                decoded.cpp
            )));
        }

        let tile = [(0, 0), (0, 1), (1, 0), (1, 1)]
            .map(|(row, col)| Self::cfa_color(decoded.cfa.color_at(row, col)));
        let pattern = match tile {
            [Some(a), Some(b), Some(c), Some(d)] => BayerPattern::from_tile([a, b, c, d]),
            _ => None,
        }
        .ok_or_else(|| {
            PipelineError::UnsupportedFormat(format!("CFA layout {}", decoded.cfa.name))
        })?;

        // Integer data is already in DN; float data is normalized and is
        // scaled to the 16-bit range.
        let payload: Vec<u8> = match decoded.data {
            RawloaderImageData::Integer(values) => {
                values.iter().flat_map(|&v| v.to_le_bytes()).collect()
            }
            RawloaderImageData::Float(values) => values
                .iter()
                .flat_map(|&v| ((v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).to_le_bytes())
                .collect(),
        };

        let bl = decoded.blacklevels;
        let white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);

        debug!(
            width = decoded.width,
            height = decoded.height,
            ?pattern,
            white_level,
            "Decoded RAW container"
        );

        Ok(RawFrame {
            data: payload,
            width: decoded.width,
            height: decoded.height,
            pattern,
            bit_depth: 16,
            black_levels: [bl[0], bl[1], bl[1], bl[2]],
            white_level,
        })
    }
}
