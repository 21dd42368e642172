use crate::image_pipeline::common::{PipelineError, Result};

/// Largest grid accepted per axis.
pub const MAX_GRID_SIZE: usize = 256;

/// Cubic RGB grid of `size` entries per axis.
///
/// Entry `(r, g, b)` lives at `r + g * size + b * size²`, the order used by
/// `.cube` files and by 3D textures uploaded for the preview.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLookupTable {
    size: usize,
    data: Vec<[f32; 3]>,
}

impl ColorLookupTable {
    pub fn new(size: usize, data: Vec<[f32; 3]>) -> Result<Self> {
        if !(2..=MAX_GRID_SIZE).contains(&size) {
            return Err(PipelineError::LutError(format!(
                "grid size must be within 2..={}, got {}",
                MAX_GRID_SIZE, size
            )));
        }
        let expected = size * size * size;
        if data.len() != expected {
            return Err(PipelineError::LutError(format!(
                "expected {} entries for size {}, found {}",
                expected,
                size,
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Table that maps every color to itself.
    pub fn identity(size: usize) -> Self {
        let size = size.clamp(2, MAX_GRID_SIZE);
        let max = (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 / max, g as f32 / max, b as f32 / max]);
                }
            }
        }
        Self { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data(&self) -> &[[f32; 3]] {
        &self.data
    }

    #[inline]
    pub fn at(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[r + self.size * (g + self.size * b)]
    }
}
