//! Simplified AHD: the missing green follows the direction with the lower
//! local gradient; red and blue at opposite sites are averaged diagonally.

use crate::image_pipeline::common::bayer::CfaColor;
use crate::image_pipeline::common::{BayerPattern, LinearImageBuffer};
use crate::image_pipeline::debayer::bilinear;
use crate::image_pipeline::debayer::types::Mosaic;

pub(super) fn demosaic(mosaic: Mosaic<'_>, pattern: BayerPattern) -> LinearImageBuffer {
    let mut out = LinearImageBuffer::new(mosaic.width, mosaic.height);
    for y in 0..mosaic.height {
        for x in 0..mosaic.width {
            let mut rgb = bilinear::interpolate(mosaic, pattern, x, y);
            if pattern.color_at(x, y) != CfaColor::Green {
                rgb[CfaColor::Green.channel()] = directional_green(mosaic, x as isize, y as isize);
            }
            out.set_pixel(x, y, rgb);
        }
    }
    out
}

fn directional_green(m: Mosaic<'_>, x: isize, y: isize) -> f32 {
    let c = m.at(x, y);
    let grad_h = (m.at(x - 1, y) - m.at(x + 1, y)).abs() + (2.0 * c - m.at(x - 2, y) - m.at(x + 2, y)).abs();
    let grad_v = (m.at(x, y - 1) - m.at(x, y + 1)).abs() + (2.0 * c - m.at(x, y - 2) - m.at(x, y + 2)).abs();

    let horizontal = (m.at(x - 1, y) + m.at(x + 1, y)) * 0.5;
    let vertical = (m.at(x, y - 1) + m.at(x, y + 1)) * 0.5;

    if grad_h < grad_v {
        horizontal
    } else if grad_v < grad_h {
        vertical
    } else {
        (horizontal + vertical) * 0.5
    }
}
