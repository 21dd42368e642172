use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExposureAnalysis {
    /// Mean luminance in [0, 1]
    pub mean_brightness: f32,
    /// Percent of pixels with a channel at or above 250/255
    pub overexposed_percent: f32,
    /// Percent of pixels with every channel at or below 5/255
    pub underexposed_percent: f32,
    pub is_overexposed: bool,
    pub is_underexposed: bool,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DynamicRangeAnalysis {
    /// Lowest 8-bit luminance bin holding at least 0.1% of pixels
    pub low: u8,
    /// Highest such bin
    pub high: u8,
    /// `(high - low) / 255`
    pub utilization: f32,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseAnalysis {
    /// Estimated Gaussian noise sigma of luminance, [0, 1] units
    pub sigma: f32,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SharpnessAnalysis {
    pub laplacian_variance: f32,
    /// Fraction of interior pixels with a strong Laplacian response
    pub edge_density: f32,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    pub exposure: ExposureAnalysis,
    pub dynamic_range: DynamicRangeAnalysis,
    pub noise: NoiseAnalysis,
    pub sharpness: SharpnessAnalysis,
    /// Weighted composite in [0, 100]
    pub overall_score: f32,
}
