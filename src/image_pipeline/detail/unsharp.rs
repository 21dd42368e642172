use crate::image_pipeline::common::LinearImageBuffer;

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let sigma = sigma.max(0.1);
    let radius = (sigma * 2.0).ceil() as isize;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// Separable Gaussian blur with clamped edges.
pub fn gaussian_blur(input: &LinearImageBuffer, sigma: f32) -> LinearImageBuffer {
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let (width, height) = (input.width(), input.height());

    let mut horizontal = LinearImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, &w) in kernel.iter().enumerate() {
                let p = input.pixel_clamped(x as isize + k as isize - radius, y as isize);
                acc[0] += p[0] * w;
                acc[1] += p[1] * w;
                acc[2] += p[2] * w;
            }
            horizontal.set_pixel(x, y, acc);
        }
    }

    let mut out = LinearImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, &w) in kernel.iter().enumerate() {
                let p = horizontal.pixel_clamped(x as isize, y as isize + k as isize - radius);
                acc[0] += p[0] * w;
                acc[1] += p[1] * w;
                acc[2] += p[2] * w;
            }
            out.set_pixel(x, y, acc);
        }
    }
    out
}

/// Adds back `amount` times the high-pass detail. Detail smaller than
/// `threshold` is scaled down linearly so flat-area noise is not amplified.
pub fn unsharp_mask(input: &LinearImageBuffer, amount: f32, sigma: f32, threshold: f32) -> LinearImageBuffer {
    let blurred = gaussian_blur(input, sigma);
    let mut out = input.clone();
    for (value, &blur) in out.data_mut().iter_mut().zip(blurred.data()) {
        let detail = *value - blur;
        let magnitude = detail.abs();
        let scale = if threshold > 0.0 && magnitude < threshold {
            amount * magnitude / threshold
        } else {
            amount
        };
        *value = (*value + detail * scale).clamp(0.0, 1.0);
    }
    out
}
