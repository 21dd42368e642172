//! Variable Number of Gradients demosaic.
//!
//! For each interior site, gradients are measured along eight directions at
//! stride 2. Directions whose gradient stays within 1.5x of the smallest
//! one contribute the two sites along their ray, weighted by inverse
//! gradient. A chroma channel no selected ray reaches is rebuilt from its
//! color difference to green, so it does not blend across the edge.
//! Sites within two pixels of the border use the bilinear stencils.

use crate::image_pipeline::common::bayer::CfaColor;
use crate::image_pipeline::common::{BayerPattern, LinearImageBuffer};
use crate::image_pipeline::debayer::bilinear;
use crate::image_pipeline::debayer::types::Mosaic;

const DIRECTIONS: [(isize, isize); 8] = [
    (0, -1),
    (0, 1),
    (1, 0),
    (-1, 0),
    (1, -1),
    (-1, -1),
    (1, 1),
    (-1, 1),
];
const THRESHOLD_SCALE: f32 = 1.5;
const EPSILON: f32 = 1e-4;
const MARGIN: usize = 2;

pub(super) fn demosaic(mosaic: Mosaic<'_>, pattern: BayerPattern) -> LinearImageBuffer {
    let (width, height) = (mosaic.width, mosaic.height);
    let mut out = LinearImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let interior = x >= MARGIN && y >= MARGIN && x + MARGIN < width && y + MARGIN < height;
            let rgb = if interior {
                interpolate(mosaic, pattern, x, y)
            } else {
                bilinear::interpolate(mosaic, pattern, x, y)
            };
            out.set_pixel(x, y, rgb);
        }
    }
    out
}

fn interpolate(m: Mosaic<'_>, pattern: BayerPattern, x: usize, y: usize) -> [f32; 3] {
    let (xi, yi) = (x as isize, y as isize);
    let center = m.at(xi, yi);

    let gradients = DIRECTIONS.map(|(dx, dy)| {
        (m.at(xi + 2 * dx, yi + 2 * dy) - center).abs() + (m.at(xi + dx, yi + dy) - m.at(xi - dx, yi - dy)).abs()
    });
    let min_gradient = gradients.iter().copied().fold(f32::INFINITY, f32::min);
    let threshold = THRESHOLD_SCALE * min_gradient + EPSILON;

    let mut sums = [0.0f32; 3];
    let mut weights = [0.0f32; 3];
    for (&(dx, dy), &gradient) in DIRECTIONS.iter().zip(gradients.iter()) {
        if gradient > threshold {
            continue;
        }
        let weight = 1.0 / (gradient + EPSILON);
        // only the two steps along the ray; they carry two of the colors
        for step in 1..=2 {
            let (sx, sy) = (xi + step * dx, yi + step * dy);
            let channel = pattern.color_at(sx as usize, sy as usize).channel();
            sums[channel] += weight * m.at(sx, sy);
            weights[channel] += weight;
        }
    }

    let own = pattern.color_at(x, y);
    let mut rgb = [0.0f32; 3];
    rgb[own.channel()] = center;

    let green = CfaColor::Green.channel();
    if own != CfaColor::Green {
        rgb[green] = if weights[green] > 0.0 {
            sums[green] / weights[green]
        } else {
            bilinear::interpolate(m, pattern, x, y)[green]
        };
    }
    for c in [CfaColor::Red.channel(), CfaColor::Blue.channel()] {
        if c == own.channel() {
            continue;
        }
        rgb[c] = if weights[c] > 0.0 {
            sums[c] / weights[c]
        } else {
            color_difference(m, pattern, x, y, c, rgb[green])
        };
    }
    rgb
}

/// Estimates chroma channel `c` from the nearest sites of that color by
/// carrying their color difference to green over to `green`.
fn color_difference(m: Mosaic<'_>, pattern: BayerPattern, x: usize, y: usize, c: usize, green: f32) -> f32 {
    let (xi, yi) = (x as isize, y as isize);
    let sites: &[(isize, isize)] = if pattern.color_at(x, y) != CfaColor::Green {
        &[(-1, -1), (1, -1), (-1, 1), (1, 1)]
    } else if pattern.color_at(x + 1, y).channel() == c {
        &[(-1, 0), (1, 0)]
    } else {
        &[(0, -1), (0, 1)]
    };

    let difference: f32 = sites
        .iter()
        .map(|&(dx, dy)| {
            let (sx, sy) = (xi + dx, yi + dy);
            let site_green = (m.at(sx - 1, sy) + m.at(sx + 1, sy) + m.at(sx, sy - 1) + m.at(sx, sy + 1)) * 0.25;
            m.at(sx, sy) - site_green
        })
        .sum::<f32>()
        / sites.len() as f32;
    green + difference
}
