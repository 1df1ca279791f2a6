// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gaussian blur — separable convolution with a square, odd-sized kernel.
//
// BORDER HANDLING: reflect-101. Out-of-range taps mirror around the edge
// sample without repeating it (`dcb|abcd|cba`).

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::MAX_BLUR_KERNEL_SIZE;
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;
use crate::transform::color::saturate;

/// Fixed binomial kernels used for sizes up to 7 when sigma is automatic.
const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Sigma derived from the kernel size when the caller passes `sigma <= 0`.
pub fn auto_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Build a normalized 1D Gaussian kernel of odd length `kernel_size`.
///
/// With `sigma <= 0` and `kernel_size <= 7` the fixed binomial kernels are
/// returned; otherwise sigma (or `auto_sigma`) drives a sampled Gaussian.
pub fn gaussian_kernel(kernel_size: u32, sigma: f32) -> Result<Vec<f32>> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(BildwerkError::InvalidParameter(format!(
            "blur kernel size must be a positive odd number, got {kernel_size}"
        )));
    }
    if kernel_size > MAX_BLUR_KERNEL_SIZE {
        return Err(BildwerkError::InvalidParameter(format!(
            "blur kernel size must be at most {MAX_BLUR_KERNEL_SIZE}, got {kernel_size}"
        )));
    }
    if !sigma.is_finite() {
        return Err(BildwerkError::InvalidParameter(format!(
            "blur sigma must be finite, got {sigma}"
        )));
    }

    let half = (kernel_size / 2) as usize;
    if sigma <= 0.0 && half < SMALL_KERNELS.len() {
        return Ok(SMALL_KERNELS[half].to_vec());
    }

    let sigma = if sigma > 0.0 { sigma } else { auto_sigma(kernel_size) };
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..kernel_size as usize)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();

    // Normalize so coefficients sum to 1 (preserves image brightness).
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    Ok(kernel)
}

/// Gaussian-smooth every channel of `buf`.
///
/// `kernel_size` must be odd; 1 is the identity. `sigma <= 0` derives the
/// standard deviation from the kernel size. Dimensions and channel count are
/// preserved.
#[instrument(skip(buf), fields(channels = buf.channels()))]
pub fn gaussian_blur(buf: &PixelBuffer, kernel_size: u32, sigma: f32) -> Result<PixelBuffer> {
    let kernel = gaussian_kernel(kernel_size, sigma)?;
    debug!(taps = kernel.len(), "Gaussian kernel built");

    let (width, height) = buf.dimensions();
    let (width, height) = (width as usize, height as usize);
    let channels = buf.channels() as usize;

    let horizontal = convolve_rows(buf.as_raw(), width, height, channels, &kernel);
    let mut out = buf.clone();
    convolve_cols(&horizontal, width, height, channels, &kernel, out.samples_mut());
    Ok(out)
}

/// `gaussian_blur` with sigma derived from `kernel_size`.
pub fn blur(buf: &PixelBuffer, kernel_size: u32) -> Result<PixelBuffer> {
    gaussian_blur(buf, kernel_size, 0.0)
}

/// Map a possibly out-of-range index into `0..len` by reflect-101.
fn reflect_101(index: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let folded = index.rem_euclid(period);
    if folded >= len as isize {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

/// Horizontal pass over interleaved samples; f32 output, same layout.
fn convolve_rows(
    src: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
) -> Vec<f32> {
    let half = (kernel.len() / 2) as isize;
    let stride = width * channels;
    let mut dst = vec![0.0f32; src.len()];

    for y in 0..height {
        let row = &src[y * stride..(y + 1) * stride];
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sx = reflect_101(x as isize + ki as isize - half, width);
                    acc += row[sx * channels + c] as f32 * kv;
                }
                dst[y * stride + x * channels + c] = acc;
            }
        }
    }
    dst
}

/// Vertical pass; rounds into `dst`.
fn convolve_cols(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    dst: &mut [u8],
) {
    let half = (kernel.len() / 2) as isize;
    let stride = width * channels;

    for y in 0..height {
        for i in 0..stride {
            let mut acc = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + ki as isize - half, height);
                acc += src[sy * stride + i] * kv;
            }
            dst[y * stride + i] = saturate(acc);
        }
    }
}
