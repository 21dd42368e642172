//! Adobe/Resolve `.cube` reader.
//!
//! ```text
//! TITLE "Warm"
//! LUT_3D_SIZE 33
//! 0.0 0.0 0.0
//! ...
//! ```
//!
//! Data lines run red-fastest, matching [`ColorLookupTable`] storage.
//! Only the unit input domain is accepted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::image_pipeline::common::{PipelineError, Result};
use crate::image_pipeline::lut::table::MAX_GRID_SIZE;
use crate::image_pipeline::lut::ColorLookupTable;

fn parse_error(message: impl Into<String>) -> PipelineError {
    PipelineError::LutError(message.into())
}

pub fn read_cube<P: AsRef<Path>>(path: P) -> Result<ColorLookupTable> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?;
    parse_cube(BufReader::new(file))
}

pub fn parse_cube<R: BufRead>(reader: R) -> Result<ColorLookupTable> {
    let mut size: Option<usize> = None;
    let mut data: Vec<[f32; 3]> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with("TITLE") {
            continue;
        }

        if line.starts_with("LUT_3D_SIZE") {
            size = Some(parse_size(line)?);
        } else if line.starts_with("LUT_1D_SIZE") {
            return Err(parse_error("expected 3D LUT, found 1D"));
        } else if line.starts_with("DOMAIN_MIN") {
            expect_domain(line, 0.0)?;
        } else if line.starts_with("DOMAIN_MAX") {
            expect_domain(line, 1.0)?;
        } else if line.starts_with("LUT_3D_INPUT_RANGE") {
            continue;
        } else {
            data.push(parse_rgb(line)?);
        }
    }

    let size = size.ok_or_else(|| parse_error("missing LUT_3D_SIZE"))?;
    ColorLookupTable::new(size, data)
}

fn parse_size(line: &str) -> Result<usize> {
    let size: usize = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| parse_error("invalid size line"))?
        .parse()
        .map_err(|_| parse_error(format!("invalid size: {}", line)))?;
    if !(2..=MAX_GRID_SIZE).contains(&size) {
        return Err(parse_error(format!("size {} outside 2..={}", size, MAX_GRID_SIZE)));
    }
    Ok(size)
}

fn parse_triplet(values: &[&str], line: &str) -> Result<[f32; 3]> {
    if values.len() != 3 {
        return Err(parse_error(format!("expected 3 values: {}", line)));
    }
    let mut rgb = [0.0f32; 3];
    for (out, value) in rgb.iter_mut().zip(values) {
        *out = value
            .parse()
            .map_err(|_| parse_error(format!("invalid number '{}' in: {}", value, line)))?;
    }
    Ok(rgb)
}

fn parse_rgb(line: &str) -> Result<[f32; 3]> {
    let values: Vec<&str> = line.split_whitespace().collect();
    parse_triplet(&values, line)
}

fn expect_domain(line: &str, expected: f32) -> Result<()> {
    let values: Vec<&str> = line.split_whitespace().skip(1).collect();
    let domain = parse_triplet(&values, line)?;
    if domain.iter().any(|&v| v != expected) {
        return Err(parse_error(format!("unsupported domain: {}", line)));
    }
    Ok(())
}
