//! Interleaved float RGB buffer shared by every stage.
//!
//! Layout is fixed: `index = (y * width + x) * 3 + channel`, channel order
//! R, G, B. Values are scene-linear and may exceed 1.0 mid-stage; stage
//! outputs are clamped to [0, 1].

use image::RgbImage;

use crate::image_pipeline::common::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct LinearImageBuffer {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl LinearImageBuffer {
    /// Creates a black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height * 3],
        }
    }

    /// Wraps existing interleaved data, checking its length.
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height * 3 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        Ok(Self { width, height, data })
    }

    /// Builds a buffer where every pixel holds `rgb`.
    pub fn filled(width: usize, height: usize, rgb: [f32; 3]) -> Self {
        let data = std::iter::repeat_n(rgb, width * height).flatten().collect();
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 3
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        let i = self.index(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Pixel at clamped coordinates, for stencils that run off the edge.
    #[inline]
    pub fn pixel_clamped(&self, x: isize, y: isize) -> [f32; 3] {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.pixel(x, y)
    }

    pub fn pixels(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(3)
    }

    /// Returns a new buffer with `f` applied to every pixel.
    pub fn map_pixels<F>(&self, mut f: F) -> Self
    where
        F: FnMut([f32; 3]) -> [f32; 3],
    {
        let data = self
            .data
            .chunks_exact(3)
            .flat_map(|p| f([p[0], p[1], p[2]]))
            .collect();
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub fn clamp_unit(&mut self) {
        for v in &mut self.data {
            *v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        }
    }

    /// Consumes the buffer and returns it clamped to [0, 1].
    pub fn clamped(mut self) -> Self {
        self.clamp_unit();
        self
    }

    pub fn same_dimensions(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Quantizes to 16 bits per channel, interleaved.
    pub fn to_rgb16(&self) -> Vec<u16> {
        self.data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
            .collect()
    }

    /// Quantizes to an 8-bit image.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let bytes = self
            .data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        RgbImage::from_raw(self.width as u32, self.height as u32, bytes)
            .ok_or(PipelineError::InvalidDimensions(self.width, self.height))
    }

    pub fn from_rgb_image(image: &RgbImage) -> Self {
        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            data: image.as_raw().iter().map(|&v| v as f32 / 255.0).collect(),
        }
    }
}
