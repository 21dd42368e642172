use approx::assert_relative_eq;

use super::*;
use crate::image_pipeline::common::LinearImageBuffer;
use crate::image_pipeline::config::DetailParameters;

fn noisy_gray(width: usize, height: usize, level: f32, amplitude: f32) -> LinearImageBuffer {
    let mut state = 12345u32;
    let data = (0..width * height * 3)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let n = ((state >> 16) & 0x7FFF) as f32 / 32767.0 - 0.5;
            level + n * amplitude
        })
        .collect();
    LinearImageBuffer::from_data(width, height, data).unwrap()
}

fn step_edge(width: usize, height: usize, dark: f32, bright: f32) -> LinearImageBuffer {
    let mut image = LinearImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = if x < width / 2 { dark } else { bright };
            image.set_pixel(x, y, [v, v, v]);
        }
    }
    image
}

fn variance(image: &LinearImageBuffer) -> f32 {
    let n = image.data().len() as f32;
    let mean = image.data().iter().sum::<f32>() / n;
    image.data().iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n
}

#[test]
fn test_all_zero_strengths_is_identity() {
    let input = noisy_gray(12, 12, 0.5, 0.2);
    let params = DetailParameters {
        denoise_strength: 0.0,
        texture_protection: 0.0,
        sharpen_amount: 0.0,
        ..DetailParameters::default()
    };
    let out = DetailEngine::new().process(&input, &params);
    assert_eq!(out, input.clamped());
}

#[test]
fn test_bilateral_reduces_noise() {
    let input = noisy_gray(24, 24, 0.5, 0.05);
    let out = bilateral_denoise(&input, 1.0);
    assert!(variance(&out) < variance(&input) * 0.5);
}

#[test]
fn test_bilateral_zero_strength_skips() {
    let input = noisy_gray(8, 8, 0.5, 0.1);
    assert_eq!(bilateral_denoise(&input, 0.0), input);
}

#[test]
fn test_bilateral_preserves_strong_edge() {
    let input = step_edge(16, 8, 0.1, 0.9);
    let out = bilateral_denoise(&input, 0.5);
    assert_relative_eq!(out.pixel(7, 4)[0], 0.1, epsilon = 0.01);
    assert_relative_eq!(out.pixel(8, 4)[0], 0.9, epsilon = 0.01);
}

#[test]
fn test_masked_bilateral_leaves_unmasked_pixels() {
    let input = noisy_gray(10, 10, 0.5, 0.1);
    let out = bilateral_denoise_masked(&input, 1.0, |x, _, _| x < 5);
    for y in 0..10 {
        for x in 5..10 {
            assert_eq!(out.pixel(x, y), input.pixel(x, y));
        }
    }
}

#[test]
fn test_texture_protection_restores_checkerboard() {
    let mut original = LinearImageBuffer::new(8, 8);
    for y in 0..8 {
        for x in 0..8 {
            let v = ((x + y) % 2) as f32;
            original.set_pixel(x, y, [v, v, v]);
        }
    }
    assert!(local_luma_variance(&original, 4, 4) > TEXTURE_VARIANCE_THRESHOLD);

    let denoised = LinearImageBuffer::filled(8, 8, [0.5, 0.5, 0.5]);
    let protected = protect_texture(&original, &denoised, 1.0);
    assert_eq!(protected.pixel(4, 4), original.pixel(4, 4));
}

#[test]
fn test_texture_protection_ignores_flat_areas() {
    let original = LinearImageBuffer::filled(6, 6, [0.3, 0.3, 0.3]);
    let denoised = LinearImageBuffer::filled(6, 6, [0.31, 0.31, 0.31]);
    assert_eq!(protect_texture(&original, &denoised, 1.0), denoised);
}

#[test]
fn test_gaussian_blur_keeps_constant_image() {
    let input = LinearImageBuffer::filled(9, 7, [0.2, 0.4, 0.6]);
    let out = gaussian_blur(&input, 1.5);
    for (a, b) in out.data().iter().zip(input.data()) {
        assert_relative_eq!(a, b, epsilon = 1e-5);
    }
}

#[test]
fn test_unsharp_increases_edge_contrast() {
    let input = step_edge(16, 4, 0.3, 0.7);
    let out = unsharp_mask(&input, 1.0, 1.0, 0.0);
    assert!(out.pixel(7, 2)[0] < 0.3);
    assert!(out.pixel(8, 2)[0] > 0.7);
    // Far from the edge nothing changes.
    assert_relative_eq!(out.pixel(0, 2)[0], 0.3, epsilon = 1e-5);
}

#[test]
fn test_unsharp_threshold_suppresses_small_detail() {
    let input = step_edge(16, 4, 0.50, 0.51);
    let plain = unsharp_mask(&input, 1.0, 1.0, 0.0);
    let thresholded = unsharp_mask(&input, 1.0, 1.0, 0.1);
    let boost_plain = plain.pixel(8, 2)[0] - 0.51;
    let boost_thresholded = thresholded.pixel(8, 2)[0] - 0.51;
    assert!(boost_plain > 0.0);
    assert!(boost_thresholded < boost_plain * 0.2);
}

#[test]
fn test_unsharp_keeps_dimensions() {
    let input = noisy_gray(7, 3, 0.5, 0.3);
    let out = unsharp_mask(&input, 2.0, 1.0, 0.05);
    assert_eq!((out.width(), out.height()), (7, 3));
    assert!(out.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_engine_output_in_unit_range() {
    let input = noisy_gray(16, 16, 0.5, 1.5);
    let out = DetailEngine::new().process(&input, &DetailParameters::default());
    assert_eq!(out.pixel_count(), input.pixel_count());
    assert!(out.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
}
