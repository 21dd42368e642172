//! Parameter records for every pipeline stage

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::DemosaicMethod;

/// Edge-aware denoise and sharpening controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailParameters {
    /// Bilateral denoise strength, 0 disables the filter (0.0 - 1.0)
    pub denoise_strength: f32,
    /// How strongly textured areas are pulled back to the pre-denoise image (0.0 - 1.0)
    pub texture_protection: f32,
    /// Unsharp-mask gain
    pub sharpen_amount: f32,
    /// Gaussian sigma of the unsharp-mask blur, in pixels
    pub sharpen_radius: f32,
    /// Detail magnitude below which sharpening fades out
    pub sharpen_threshold: f32,
}

impl Default for DetailParameters {
    fn default() -> Self {
        Self {
            denoise_strength: 0.3,
            texture_protection: 0.5,
            sharpen_amount: 0.5,
            sharpen_radius: 1.0,
            sharpen_threshold: 0.02,
        }
    }
}

/// Highlight, shadow and local-contrast controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicRangeParameters {
    /// Blend factor for reconstructed clipped channels (0.0 - 1.0)
    pub highlight_recovery: f32,
    /// Shadow boost strength (0.0 - 1.0)
    pub shadow_lift: f32,
    /// Bilateral strength applied to deep shadows after lifting (0.0 - 1.0)
    pub noise_reduction: f32,
    /// Blend between original and equalized luma (0.0 - 1.0)
    pub local_contrast: f32,
    /// CLAHE clip limit as a multiple of the mean bin height
    pub clip_limit: f32,
}

impl Default for DynamicRangeParameters {
    fn default() -> Self {
        Self {
            highlight_recovery: 0.5,
            shadow_lift: 0.3,
            noise_reduction: 0.2,
            local_contrast: 0.3,
            clip_limit: 2.0,
        }
    }
}

/// Named illuminants for manual white balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhiteBalancePreset {
    Daylight,
    Cloudy,
    Shade,
    Tungsten,
    Fluorescent,
    Flash,
}

impl WhiteBalancePreset {
    pub fn kelvin(self) -> f32 {
        match self {
            WhiteBalancePreset::Daylight => 5500.0,
            WhiteBalancePreset::Cloudy => 6500.0,
            WhiteBalancePreset::Shade => 7500.0,
            WhiteBalancePreset::Tungsten => 3200.0,
            WhiteBalancePreset::Fluorescent => 4000.0,
            WhiteBalancePreset::Flash => 5500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum WhiteBalanceMode {
    /// Gray-world estimate from the image itself
    #[default]
    Auto,
    Preset { preset: WhiteBalancePreset },
    /// Color temperature in Kelvin plus green/magenta tint (-100 to +100)
    Manual { kelvin: f32, tint: f32 },
}

/// Output encoding target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    #[default]
    Srgb,
    DciP3,
    AdobeRgb,
    ProPhoto,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorParameters {
    pub white_balance: WhiteBalanceMode,
    pub color_space: ColorSpace,
    /// Chroma change in percent; 0 leaves saturation untouched
    pub saturation_boost: f32,
    pub skin_tone_refinement: bool,
    /// Replaces the built-in sensor-to-sRGB matrix when set
    pub color_matrix: Option<[[f32; 3]; 3]>,
}

impl Default for ColorParameters {
    fn default() -> Self {
        Self {
            white_balance: WhiteBalanceMode::Auto,
            color_space: ColorSpace::Srgb,
            saturation_boost: 10.0,
            skin_tone_refinement: true,
            color_matrix: None,
        }
    }
}

/// 3D LUT "look" selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookParameters {
    pub lut_id: Option<String>,
    /// Blend between the input and the looked-up color (0.0 - 1.0)
    pub intensity: f32,
}

impl Default for LookParameters {
    fn default() -> Self {
        Self {
            lut_id: None,
            intensity: 1.0,
        }
    }
}

/// Full set of parameters for one RAW development.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingParameters {
    pub demosaic: DemosaicMethod,
    pub detail: DetailParameters,
    pub dynamic_range: DynamicRangeParameters,
    pub color: ColorParameters,
    pub look: LookParameters,
    /// Also produce the low-contrast log grading master
    pub produce_flat_master: bool,
}

impl ProcessingParameters {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PipelineError::InputReadError(format!("invalid settings: {}", e)))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params = ProcessingParameters::from_json(
            r#"{
                "demosaic": "vng",
                "color": { "white_balance": { "mode": "manual", "kelvin": 3200.0, "tint": 10.0 } },
                "look": { "lut_id": "teal_orange" }
            }"#,
        )
        .unwrap();

        assert_eq!(params.demosaic, DemosaicMethod::Vng);
        assert_eq!(
            params.color.white_balance,
            WhiteBalanceMode::Manual { kelvin: 3200.0, tint: 10.0 }
        );
        assert_eq!(params.color.color_space, ColorSpace::Srgb);
        assert_eq!(params.look.lut_id.as_deref(), Some("teal_orange"));
        assert_eq!(params.look.intensity, 1.0);
        assert_eq!(params.detail, DetailParameters::default());
    }

    #[test]
    fn test_preset_json() {
        let params = ProcessingParameters::from_json(
            r#"{ "color": { "white_balance": { "mode": "preset", "preset": "tungsten" } } }"#,
        )
        .unwrap();
        assert_eq!(
            params.color.white_balance,
            WhiteBalanceMode::Preset { preset: WhiteBalancePreset::Tungsten }
        );
    }

    #[test]
    fn test_invalid_json_is_input_error() {
        let result = ProcessingParameters::from_json("{ not json");
        assert!(matches!(result, Err(PipelineError::InputReadError(_))));
    }
}
