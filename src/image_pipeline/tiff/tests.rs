use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;

use super::*;
use crate::image_pipeline::common::LinearImageBuffer;

fn decode(bytes: Vec<u8>) -> (u32, u32, ColorType, Vec<u16>) {
    let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
    let (w, h) = decoder.dimensions().unwrap();
    let color = decoder.colortype().unwrap();
    let data = match decoder.read_image().unwrap() {
        DecodingResult::U16(data) => data,
        other => panic!("unexpected sample type: {:?}", std::mem::discriminant(&other)),
    };
    (w, h, color, data)
}

fn sample_image() -> LinearImageBuffer {
    let mut image = LinearImageBuffer::new(5, 3);
    image.set_pixel(0, 0, [1.0, 0.5, 0.0]);
    image.set_pixel(4, 2, [2.0, -1.0, 0.25]);
    image
}

#[test]
fn test_builder_defaults() {
    let config = TiffConfig::builder().build();
    assert_eq!(config, TiffConfig::default());

    let config = TiffConfig::builder()
        .compression(TiffCompression::Lzw)
        .predictor(None)
        .build();
    assert_eq!(config.compression, TiffCompression::Lzw);
    assert_eq!(config.predictor, None);
}

#[test]
fn test_writes_rgb16_for_every_compression() {
    let image = sample_image();
    for compression in [
        TiffCompression::None,
        TiffCompression::Lzw,
        TiffCompression::DeflateFast,
        TiffCompression::DeflateBalanced,
        TiffCompression::DeflateBest,
    ] {
        for predictor in [None, Some(2)] {
            let config = TiffConfig::builder()
                .compression(compression)
                .predictor(predictor)
                .build();
            let mut bytes = Vec::new();
            StandardTiffWriter.write_rgb16(&image, &mut bytes, &config).unwrap();

            let (w, h, color, data) = decode(bytes);
            assert_eq!((w, h), (5, 3));
            assert_eq!(color, ColorType::RGB(16));
            assert_eq!(data.len(), 5 * 3 * 3);
            assert_eq!(&data[..3], &[65535, 32768, 0]);
            // out-of-range values are clamped
            assert_eq!(&data[data.len() - 3..], &[65535, 0, 16384]);
        }
    }
}
