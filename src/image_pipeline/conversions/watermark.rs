use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl WatermarkPosition {
    /// Top-left corner for a `mark` sized overlay, `margin` pixels from the
    /// edges. Marks larger than the image are pinned at the origin.
    pub fn anchor(self, image: (u32, u32), mark: (u32, u32), margin: u32) -> (u32, u32) {
        let right = image.0.saturating_sub(mark.0 + margin);
        let bottom = image.1.saturating_sub(mark.1 + margin);
        let left = margin.min(right);
        let top = margin.min(bottom);
        match self {
            WatermarkPosition::TopLeft => (left, top),
            WatermarkPosition::TopRight => (right, top),
            WatermarkPosition::BottomLeft => (left, bottom),
            WatermarkPosition::BottomRight => (right, bottom),
            WatermarkPosition::Center => (
                image.0.saturating_sub(mark.0) / 2,
                image.1.saturating_sub(mark.1) / 2,
            ),
        }
    }
}

/// Overlay applied after color and LUT stages, before the final encode.
pub trait Watermark: Send + Sync {
    fn apply(&self, image: RgbImage, position: WatermarkPosition) -> Result<RgbImage>;
}

/// Returns the image unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWatermark;

impl Watermark for NoWatermark {
    fn apply(&self, image: RgbImage, _position: WatermarkPosition) -> Result<RgbImage> {
        Ok(image)
    }
}
