use approx::{assert_abs_diff_eq, assert_relative_eq};

use super::math::{
    kelvin_to_rgb, linear_srgb_to_oklab, lut_texture_coordinate, oklab_chroma,
    oklab_to_linear_srgb, srgb_decode, srgb_encode,
};
use super::*;
use crate::image_pipeline::common::LinearImageBuffer;
use crate::image_pipeline::config::{ColorParameters, ColorSpace, WhiteBalanceMode, WhiteBalancePreset};

fn color_grid(steps: usize) -> Vec<[f32; 3]> {
    let mut colors = Vec::new();
    for r in 0..steps {
        for g in 0..steps {
            for b in 0..steps {
                let s = (steps - 1) as f32;
                colors.push([r as f32 / s, g as f32 / s, b as f32 / s]);
            }
        }
    }
    colors
}

#[test]
fn test_kelvin_6600_is_near_white() {
    let rgb = kelvin_to_rgb(6600.0);
    assert_eq!(rgb[0], 1.0);
    assert!(rgb[1] > 0.99);
    assert!(rgb[2] > 0.98);
}

#[test]
fn test_kelvin_warm_and_cool_ends() {
    let warm = kelvin_to_rgb(2000.0);
    assert_eq!(warm[0], 1.0);
    assert!(warm[2] < warm[1]);

    let cool = kelvin_to_rgb(12000.0);
    assert_eq!(cool[2], 1.0);
    assert!(cool[0] < 1.0);
}

#[test]
fn test_oklab_white_and_round_trip() {
    let white = linear_srgb_to_oklab([1.0, 1.0, 1.0]);
    assert_abs_diff_eq!(white[0], 1.0, epsilon = 1e-3);
    assert_abs_diff_eq!(oklab_chroma(white), 0.0, epsilon = 1e-3);

    let rgb = [0.7, 0.25, 0.1];
    let back = oklab_to_linear_srgb(linear_srgb_to_oklab(rgb));
    for c in 0..3 {
        assert_abs_diff_eq!(back[c], rgb[c], epsilon = 1e-4);
    }
}

#[test]
fn test_srgb_transfer() {
    assert_eq!(srgb_encode(0.0), 0.0);
    assert_abs_diff_eq!(srgb_encode(1.0), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(srgb_encode(0.18), 0.4614, epsilon = 1e-3);
    assert_abs_diff_eq!(srgb_decode(srgb_encode(0.4)), 0.4, epsilon = 1e-5);
    // both segments meet at the breakpoint
    let below = srgb_encode(0.0031308);
    let above = 1.055 * 0.0031308f32.powf(1.0 / 2.4) - 0.055;
    assert_abs_diff_eq!(below, above, epsilon = 1e-5);
}

#[test]
fn test_lut_texture_coordinate_hits_texel_centers() {
    assert_relative_eq!(lut_texture_coordinate(0.0, 33), 0.5 / 33.0);
    assert_relative_eq!(lut_texture_coordinate(1.0, 33), 1.0 - 0.5 / 33.0, epsilon = 1e-6);
    assert_relative_eq!(lut_texture_coordinate(2.0, 33), 1.0 - 0.5 / 33.0, epsilon = 1e-6);
}

#[test]
fn test_auto_white_balance_gray_world() {
    let image = LinearImageBuffer::filled(8, 8, [0.2, 0.4, 0.8]);
    let gains = auto_white_balance_gains(&image);
    assert_relative_eq!(gains.r, 2.0, epsilon = 1e-5);
    assert_eq!(gains.g, 1.0);
    assert_relative_eq!(gains.b, 0.5, epsilon = 1e-5);
}

#[test]
fn test_auto_white_balance_clamps_gains() {
    let image = LinearImageBuffer::filled(4, 4, [0.05, 0.5, 0.9]);
    let gains = auto_white_balance_gains(&image);
    assert_eq!(gains.r, AUTO_GAIN_RANGE.1);
    assert!(gains.b >= AUTO_GAIN_RANGE.0 && gains.b <= AUTO_GAIN_RANGE.1);
}

#[test]
fn test_auto_white_balance_ignores_black_and_clipped() {
    let black = LinearImageBuffer::new(4, 4);
    assert_eq!(auto_white_balance_gains(&black), WhiteBalanceGains::IDENTITY);

    let clipped = LinearImageBuffer::filled(4, 4, [1.0, 1.0, 1.0]);
    assert_eq!(auto_white_balance_gains(&clipped), WhiteBalanceGains::IDENTITY);
}

#[test]
fn test_reference_kelvin_is_identity() {
    let gains = kelvin_white_balance_gains(5500.0, 0.0);
    assert_relative_eq!(gains.r, 1.0, epsilon = 1e-6);
    assert_relative_eq!(gains.g, 1.0, epsilon = 1e-6);
    assert_relative_eq!(gains.b, 1.0, epsilon = 1e-6);
}

#[test]
fn test_tungsten_boosts_blue() {
    let gains = kelvin_white_balance_gains(WhiteBalancePreset::Tungsten.kelvin(), 0.0);
    assert!(gains.b > 1.0);
    assert!(gains.r < 1.0);
}

#[test]
fn test_tint_scales_green() {
    assert_relative_eq!(kelvin_white_balance_gains(5500.0, 100.0).g, 1.5);
    assert_relative_eq!(kelvin_white_balance_gains(5500.0, -100.0).g, 0.5);
}

#[test]
fn test_manual_gains_stay_in_range() {
    let (lo, hi) = MANUAL_GAIN_RANGE;
    for kelvin in (1000..=40000).step_by(500) {
        for tint in [-100.0, -30.0, 0.0, 45.0, 100.0] {
            let g = kelvin_white_balance_gains(kelvin as f32, tint);
            for v in g.as_array() {
                assert!(v >= lo && v <= hi, "{kelvin}K tint {tint}: {v}");
            }
        }
    }
}

#[test]
fn test_ratio_to_kelvin_segments_are_continuous() {
    assert_relative_eq!(ratio_to_kelvin(1.2), 4500.0, epsilon = 1e-2);
    assert_relative_eq!(ratio_to_kelvin(1.2 - 1e-4), 4500.5, epsilon = 1e-1);
    assert_relative_eq!(ratio_to_kelvin(0.9), 6000.0, epsilon = 1e-2);
    assert_relative_eq!(ratio_to_kelvin(1.0), 5500.0);
    assert_eq!(ratio_to_kelvin(10.0), 2000.0);
    assert_eq!(ratio_to_kelvin(0.0), 12000.0);
}

#[test]
fn test_temperature_estimate() {
    let warm = LinearImageBuffer::filled(20, 20, [0.9, 0.8, 0.6]);
    assert_relative_eq!(estimate_color_temperature(&warm), 3000.0, epsilon = 1.0);

    let too_few = LinearImageBuffer::filled(5, 5, [0.9, 0.8, 0.6]);
    assert_eq!(estimate_color_temperature(&too_few), DEFAULT_TEMPERATURE);

    let dark = LinearImageBuffer::filled(20, 20, [0.1, 0.1, 0.1]);
    assert_eq!(estimate_color_temperature(&dark), DEFAULT_TEMPERATURE);
}

#[test]
fn test_saturation_chroma_never_exceeds_cap() {
    for rgb in color_grid(9) {
        for boost in [50.0, 100.0, 300.0, 1000.0] {
            let out = adjust_saturation(rgb, boost);
            let chroma = oklab_chroma(linear_srgb_to_oklab(out));
            assert!(chroma <= MAX_OKLAB_CHROMA + 1e-4, "{rgb:?} boost {boost}: {chroma}");
            assert!(out.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}

#[test]
fn test_saturation_boost_increases_chroma() {
    let rgb = [0.4, 0.2, 0.1];
    let before = oklab_chroma(linear_srgb_to_oklab(rgb));
    let after = oklab_chroma(linear_srgb_to_oklab(adjust_saturation(rgb, 50.0)));
    assert!(after > before);
}

#[test]
fn test_full_desaturation_is_gray() {
    let out = adjust_saturation([0.6, 0.3, 0.1], -100.0);
    assert_abs_diff_eq!(out[0], out[1], epsilon = 1e-3);
    assert_abs_diff_eq!(out[1], out[2], epsilon = 1e-3);
}

#[test]
fn test_zero_boost_is_near_identity() {
    let rgb = [0.3, 0.5, 0.2];
    let out = adjust_saturation(rgb, 0.0);
    for c in 0..3 {
        assert_abs_diff_eq!(out[c], rgb[c], epsilon = 1e-4);
    }
}

#[test]
fn test_skin_refinement() {
    let skin = [0.8, 0.6, 0.5];
    assert!(skin_confidence(skin) > 0.0);
    let refined = refine_skin_tone(skin);
    assert!(refined[0] > skin[0]);
    assert!(refined[1] < skin[1]);
    assert_eq!(refined[2], skin[2]);

    let gray = [0.5, 0.5, 0.5];
    assert_eq!(skin_confidence(gray), 0.0);
    assert_eq!(refine_skin_tone(gray), gray);
}

#[test]
fn test_color_space_encoding() {
    assert_eq!(encode_pixel([0.0; 3], ColorSpace::Srgb), [0.0; 3]);
    assert_abs_diff_eq!(encode_pixel([0.5; 3], ColorSpace::AdobeRgb)[0], 0.7297, epsilon = 1e-3);
    assert_abs_diff_eq!(encode_pixel([0.5; 3], ColorSpace::ProPhoto)[0], 0.6804, epsilon = 1e-3);
    let p3_white = encode_pixel([1.0; 3], ColorSpace::DciP3);
    for c in p3_white {
        assert_abs_diff_eq!(c, 1.0, epsilon = 1e-4);
    }
    // out-of-range input is clamped before encoding
    assert_eq!(encode_pixel([2.0, -1.0, 0.0], ColorSpace::ProPhoto), [1.0, 0.0, 0.0]);
}

#[test]
fn test_default_matrix_preserves_neutrals() {
    for row in DEFAULT_COLOR_MATRIX {
        assert_relative_eq!(row.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }
    let gray = apply_matrix(&DEFAULT_COLOR_MATRIX, [0.3, 0.3, 0.3]);
    for c in gray {
        assert_abs_diff_eq!(c, 0.3, epsilon = 1e-5);
    }
}

#[test]
fn test_engine_neutral_gray_encodes_to_srgb() {
    let engine = ColorEngine::new();
    let params = ColorParameters {
        white_balance: WhiteBalanceMode::Manual {
            kelvin: 5500.0,
            tint: 0.0,
        },
        saturation_boost: 0.0,
        skin_tone_refinement: false,
        ..Default::default()
    };
    let output = engine.process(&LinearImageBuffer::filled(4, 4, [0.18; 3]), &params);
    let expected = srgb_encode(0.18);
    for v in output.encoded.data() {
        assert_abs_diff_eq!(*v, expected, epsilon = 1e-4);
    }
    assert_eq!(output.estimated_temperature, DEFAULT_TEMPERATURE);
}

#[test]
fn test_engine_custom_matrix_overrides_default() {
    let engine = ColorEngine::new();
    let params = ColorParameters {
        white_balance: WhiteBalanceMode::Manual {
            kelvin: 5500.0,
            tint: 0.0,
        },
        saturation_boost: 0.0,
        color_matrix: Some([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]),
        ..Default::default()
    };
    let (linear, _) = engine.correct(&LinearImageBuffer::filled(2, 2, [0.2, 0.6, 0.4]), &params);
    let px = linear.pixel(0, 0);
    assert_abs_diff_eq!(px[0], 0.6, epsilon = 1e-5);
    assert_abs_diff_eq!(px[1], 0.2, epsilon = 1e-5);
}

#[test]
fn test_engine_output_in_unit_range() {
    let mut image = LinearImageBuffer::new(16, 16);
    for y in 0..16 {
        for x in 0..16 {
            image.set_pixel(x, y, [x as f32 / 10.0, y as f32 / 15.0, 0.3]);
        }
    }
    let output = ColorEngine::default().process(&image, &ColorParameters::default());
    assert!(output.linear.data().iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(output.encoded.data().iter().all(|v| (0.0..=1.0).contains(v)));
}
