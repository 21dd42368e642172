//! Tiled contrast-limited histogram equalization on luma.
//!
//! Each tile of an 8x8 grid gets its own clipped histogram and CDF; every
//! pixel is mapped through the CDF of the tile that contains it. Chroma is
//! untouched: the luma change is added equally to R, G and B.

use crate::image_pipeline::common::LinearImageBuffer;

pub const TILE_GRID: usize = 8;
pub const HISTOGRAM_BINS: usize = 256;

#[inline]
fn luma(rgb: [f32; 3]) -> f32 {
    0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2]
}

#[inline]
fn bin_of(y: f32) -> usize {
    (y.clamp(0.0, 1.0) * (HISTOGRAM_BINS - 1) as f32).round() as usize
}

/// Clips every bin at `clip` and spreads the excess evenly over all bins.
/// The integer remainder goes one count each to the lowest bins, so the
/// histogram total is unchanged.
pub fn clip_and_redistribute(hist: &mut [u32; HISTOGRAM_BINS], clip: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }
    if excess == 0 {
        return;
    }

    let per_bin = excess / HISTOGRAM_BINS as u32;
    let remainder = (excess % HISTOGRAM_BINS as u32) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += per_bin;
        if i < remainder {
            *bin += 1;
        }
    }
}

/// Equalization lookup for one tile: bin -> equalized luma in [0, 1].
/// `None` when the CDF is degenerate.
fn tile_mapping(hist: &[u32; HISTOGRAM_BINS]) -> Option<[f32; HISTOGRAM_BINS]> {
    let mut cdf = [0u32; HISTOGRAM_BINS];
    let mut running = 0u32;
    for (i, &count) in hist.iter().enumerate() {
        running += count;
        cdf[i] = running;
    }
    let total = running;
    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    if total <= cdf_min {
        return None;
    }

    let range = (total - cdf_min) as f32;
    let mut mapping = [0.0f32; HISTOGRAM_BINS];
    for (m, &c) in mapping.iter_mut().zip(cdf.iter()) {
        *m = c.saturating_sub(cdf_min) as f32 / range;
    }
    Some(mapping)
}

/// Adds `delta` to every channel, shortened so that no channel leaves
/// [0, 1]. The channel differences, and so the chroma, stay unchanged.
pub fn shift_luma(rgb: [f32; 3], delta: f32) -> [f32; 3] {
    let rgb = rgb.map(|c| c.clamp(0.0, 1.0));
    let delta = if delta > 0.0 {
        delta.min(1.0 - rgb.iter().copied().fold(0.0, f32::max))
    } else {
        delta.max(-rgb.iter().copied().fold(1.0, f32::min))
    };
    rgb.map(|c| c + delta)
}

fn tile_bounds(extent: usize, tiles: usize, t: usize) -> (usize, usize) {
    (t * extent / tiles, (t + 1) * extent / tiles)
}

/// Blends equalized luma with the original by `strength`.
///
/// `clip_limit` is a multiple of the mean bin height (`tile_area / 256`).
pub fn local_contrast(input: &LinearImageBuffer, strength: f32, clip_limit: f32) -> LinearImageBuffer {
    let (width, height) = (input.width(), input.height());
    if width == 0 || height == 0 || strength <= 0.0 {
        return input.clone();
    }
    let strength = strength.clamp(0.0, 1.0);
    let tiles_x = TILE_GRID.min(width);
    let tiles_y = TILE_GRID.min(height);
    let mut out = input.clone();

    for ty in 0..tiles_y {
        let (y0, y1) = tile_bounds(height, tiles_y, ty);
        for tx in 0..tiles_x {
            let (x0, x1) = tile_bounds(width, tiles_x, tx);
            let area = ((x1 - x0) * (y1 - y0)) as f32;

            let mut hist = [0u32; HISTOGRAM_BINS];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[bin_of(luma(input.pixel(x, y)))] += 1;
                }
            }

            let clip = ((clip_limit * area / HISTOGRAM_BINS as f32) as u32).max(1);
            clip_and_redistribute(&mut hist, clip);
            let Some(mapping) = tile_mapping(&hist) else {
                continue;
            };

            for y in y0..y1 {
                for x in x0..x1 {
                    let rgb = input.pixel(x, y);
                    let y_old = luma(rgb);
                    let y_eq = mapping[bin_of(y_old)];
                    out.set_pixel(x, y, shift_luma(rgb, (y_eq - y_old) * strength));
                }
            }
        }
    }
    out
}
