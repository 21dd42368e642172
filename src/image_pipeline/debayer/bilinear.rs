use crate::image_pipeline::common::bayer::CfaColor;
use crate::image_pipeline::common::{BayerPattern, LinearImageBuffer};
use crate::image_pipeline::debayer::types::Mosaic;

pub(super) fn demosaic(mosaic: Mosaic<'_>, pattern: BayerPattern) -> LinearImageBuffer {
    let mut out = LinearImageBuffer::new(mosaic.width, mosaic.height);
    for y in 0..mosaic.height {
        for x in 0..mosaic.width {
            out.set_pixel(x, y, interpolate(mosaic, pattern, x, y));
        }
    }
    out
}

/// Bilinear estimate of all three channels at one site.
pub(super) fn interpolate(mosaic: Mosaic<'_>, pattern: BayerPattern, x: usize, y: usize) -> [f32; 3] {
    let (xi, yi) = (x as isize, y as isize);
    let center = pattern.color_at(x, y);

    let cross = (mosaic.at(xi - 1, yi) + mosaic.at(xi + 1, yi) + mosaic.at(xi, yi - 1) + mosaic.at(xi, yi + 1)) * 0.25;
    let diagonal = (mosaic.at(xi - 1, yi - 1)
        + mosaic.at(xi + 1, yi - 1)
        + mosaic.at(xi - 1, yi + 1)
        + mosaic.at(xi + 1, yi + 1))
        * 0.25;
    let horizontal = (mosaic.at(xi - 1, yi) + mosaic.at(xi + 1, yi)) * 0.5;
    let vertical = (mosaic.at(xi, yi - 1) + mosaic.at(xi, yi + 1)) * 0.5;

    let mut rgb = [0.0f32; 3];
    rgb[center.channel()] = mosaic.at(xi, yi);

    match center {
        CfaColor::Red | CfaColor::Blue => {
            rgb[CfaColor::Green.channel()] = cross;
            let opposite = if center == CfaColor::Red { CfaColor::Blue } else { CfaColor::Red };
            rgb[opposite.channel()] = diagonal;
        }
        CfaColor::Green => {
            let row_color = pattern.color_at(x + 1, y);
            let col_color = pattern.color_at(x, y + 1);
            rgb[row_color.channel()] = horizontal;
            rgb[col_color.channel()] = vertical;
        }
    }
    rgb
}
