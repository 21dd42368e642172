use tracing::instrument;

use crate::image_pipeline::color::math::smoothstep;
use crate::image_pipeline::common::LinearImageBuffer;

pub const MID_GRAY_IN: f32 = 0.18;
pub const MID_GRAY_OUT: f32 = 0.42;
pub const SHOULDER_CEILING: f32 = 0.95;

const TOE_END: f32 = 0.02;
const TOE_SLOPE: f32 = 0.5;
const SHOULDER_START: f32 = 0.9;
/// Decades of input mapped onto the output range above mid gray.
const LOG_DECADES: f32 = 1.5;

/// Linear-to-log curve with a linear toe, a log body anchored at mid gray
/// and a smoothstep shoulder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToneEncoder;

impl ToneEncoder {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn log_body(x: f32) -> f32 {
        MID_GRAY_OUT + (x / MID_GRAY_IN).log10() / LOG_DECADES * (1.0 - MID_GRAY_OUT)
    }

    /// Maps one linear value. Non-decreasing, output in [0, 0.95].
    pub fn apply(&self, x: f32) -> f32 {
        if x < TOE_END {
            (x * TOE_SLOPE).max(0.0)
        } else if x <= SHOULDER_START {
            Self::log_body(x)
        } else {
            let start = Self::log_body(SHOULDER_START);
            start + (SHOULDER_CEILING - start) * smoothstep(SHOULDER_START, 1.0, x)
        }
    }

    #[instrument(skip_all, fields(width = input.width(), height = input.height()))]
    pub fn encode(&self, input: &LinearImageBuffer) -> LinearImageBuffer {
        input.map_pixels(|rgb| rgb.map(|c| self.apply(c))).clamped()
    }
}
