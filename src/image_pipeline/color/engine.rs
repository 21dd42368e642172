use tracing::{debug, instrument};

use crate::image_pipeline::color::encoding::{apply_matrix, encode_pixel, DEFAULT_COLOR_MATRIX};
use crate::image_pipeline::color::saturation::adjust_saturation;
use crate::image_pipeline::color::skin::refine_skin_tone;
use crate::image_pipeline::color::temperature::estimate_color_temperature;
use crate::image_pipeline::color::white_balance::{
    auto_white_balance_gains, kelvin_white_balance_gains, WhiteBalanceGains,
};
use crate::image_pipeline::common::LinearImageBuffer;
use crate::image_pipeline::config::{ColorParameters, WhiteBalanceMode};

/// Result of a full color pass.
#[derive(Debug, Clone)]
pub struct ColorOutput {
    /// White balanced, matrixed and saturated, still scene-linear
    pub linear: LinearImageBuffer,
    /// `linear` encoded for the target color space
    pub encoded: LinearImageBuffer,
    pub gains: WhiteBalanceGains,
    /// Illuminant estimate taken before white balance
    pub estimated_temperature: f32,
}

/// White balance, CCM, saturation, encoding and skin refinement.
#[derive(Debug, Clone, Copy)]
pub struct ColorEngine {
    matrix: [[f32; 3]; 3],
}

impl Default for ColorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEngine {
    pub fn new() -> Self {
        Self::with_matrix(DEFAULT_COLOR_MATRIX)
    }

    pub fn with_matrix(matrix: [[f32; 3]; 3]) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &[[f32; 3]; 3] {
        &self.matrix
    }

    pub fn white_balance_gains(
        &self,
        image: &LinearImageBuffer,
        mode: &WhiteBalanceMode,
    ) -> WhiteBalanceGains {
        match *mode {
            WhiteBalanceMode::Auto => auto_white_balance_gains(image),
            WhiteBalanceMode::Preset { preset } => kelvin_white_balance_gains(preset.kelvin(), 0.0),
            WhiteBalanceMode::Manual { kelvin, tint } => kelvin_white_balance_gains(kelvin, tint),
        }
    }

    /// Linear-domain correction: white balance, matrix, saturation.
    pub fn correct(
        &self,
        input: &LinearImageBuffer,
        params: &ColorParameters,
    ) -> (LinearImageBuffer, WhiteBalanceGains) {
        let gains = self.white_balance_gains(input, &params.white_balance);
        let matrix = params.color_matrix.unwrap_or(self.matrix);
        let boost = params.saturation_boost;

        let corrected = input.map_pixels(|rgb| {
            let balanced = gains.apply(rgb);
            let matrixed = apply_matrix(&matrix, balanced).map(|c| c.clamp(0.0, 1.0));
            if boost != 0.0 {
                adjust_saturation(matrixed, boost)
            } else {
                matrixed
            }
        });

        (corrected, gains)
    }

    /// Gamma-encodes a corrected buffer, then refines skin tones if enabled.
    pub fn encode(&self, linear: &LinearImageBuffer, params: &ColorParameters) -> LinearImageBuffer {
        let space = params.color_space;
        let skin = params.skin_tone_refinement;
        linear.map_pixels(|rgb| {
            let encoded = encode_pixel(rgb, space);
            if skin {
                refine_skin_tone(encoded)
            } else {
                encoded
            }
        })
    }

    #[instrument(skip_all, fields(width = input.width(), height = input.height()))]
    pub fn process(&self, input: &LinearImageBuffer, params: &ColorParameters) -> ColorOutput {
        let estimated_temperature = estimate_color_temperature(input);
        let (linear, gains) = self.correct(input, params);
        let encoded = self.encode(&linear, params);

        debug!(
            r = gains.r,
            g = gains.g,
            b = gains.b,
            kelvin = estimated_temperature,
            "color pass complete"
        );

        ColorOutput {
            linear,
            encoded,
            gains,
            estimated_temperature,
        }
    }
}
