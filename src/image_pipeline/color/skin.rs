//! Skin-tone refinement on encoded RGB

const CR_RANGE: (f32, f32) = (0.55, 0.70);
const CB_RANGE: (f32, f32) = (0.40, 0.50);
const Y_RANGE: (f32, f32) = (0.15, 0.85);
const TARGET_CB: f32 = 0.45;
const TARGET_CR: f32 = 0.62;
const SIGMA: f32 = 0.05;
const NUDGE: f32 = 0.02;

fn to_ycbcr(rgb: [f32; 3]) -> [f32; 3] {
    let y = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
    let cb = 0.5 + 0.564 * (rgb[2] - y);
    let cr = 0.5 + 0.713 * (rgb[0] - y);
    [y, cb, cr]
}

fn within(v: f32, (lo, hi): (f32, f32)) -> bool {
    v >= lo && v <= hi
}

/// Confidence in [0, 1] that `rgb` is skin; zero outside the YCbCr box.
pub fn skin_confidence(rgb: [f32; 3]) -> f32 {
    let [y, cb, cr] = to_ycbcr(rgb);
    if !within(y, Y_RANGE) || !within(cb, CB_RANGE) || !within(cr, CR_RANGE) {
        return 0.0;
    }
    let d2 = (cb - TARGET_CB).powi(2) + (cr - TARGET_CR).powi(2);
    (-d2 / (2.0 * SIGMA * SIGMA)).exp()
}

/// Warms likely skin slightly: red up, green down.
pub fn refine_skin_tone(rgb: [f32; 3]) -> [f32; 3] {
    let confidence = skin_confidence(rgb);
    if confidence <= 0.0 {
        return rgb;
    }
    [
        (rgb[0] + confidence * NUDGE).clamp(0.0, 1.0),
        (rgb[1] - confidence * NUDGE).clamp(0.0, 1.0),
        rgb[2],
    ]
}
