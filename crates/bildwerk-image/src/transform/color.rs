// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-sample colour transforms — grayscale, brightness, contrast.

use bildwerk_core::error::{BildwerkError, Result};
use image::{GrayImage, Luma, Rgb};
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;

// BT.601 luma weights in 2.14 fixed point; they sum to exactly 1 << 14.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// BT.601 luma (0.299 R + 0.587 G + 0.114 B), rounded.
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Round and clamp a float sample into the u8 range.
pub(crate) fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGB buffer to a single luma plane.
///
/// A buffer that is already single-channel is returned unchanged, so the
/// conversion is idempotent.
#[instrument(skip_all, fields(channels = buf.channels()))]
pub fn grayscale(buf: &PixelBuffer) -> PixelBuffer {
    match buf {
        PixelBuffer::Gray(_) => {
            debug!("Buffer already single-channel; grayscale is a no-op");
            buf.clone()
        }
        PixelBuffer::Rgb(rgb) => {
            let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
                Luma([luma(r, g, b)])
            });
            PixelBuffer::Gray(gray)
        }
    }
}

/// Scale every sample by `factor`, i.e. blend toward black.
///
/// Any positive factor is accepted; 1.0 is the identity. Results are clamped
/// to [0, 255].
#[instrument(skip(buf))]
pub fn adjust_brightness(buf: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(BildwerkError::InvalidParameter(format!(
            "brightness factor must be a positive number, got {factor}"
        )));
    }
    Ok(buf.map_samples(|sample| saturate(sample as f32 * factor)))
}

/// Scale each sample's distance from the image's mean intensity by `factor`.
///
/// The mean is taken over the luma plane and rounded, so every channel of a
/// colour image pivots around the same gray level. `factor` 1.0 is the
/// identity and 0.0 flattens the image to its mean.
#[instrument(skip(buf))]
pub fn adjust_contrast(buf: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(BildwerkError::InvalidParameter(format!(
            "contrast factor must be a non-negative number, got {factor}"
        )));
    }
    let mean = mean_intensity(buf).round() as f32;
    debug!(mean, "Contrast pivot computed");
    Ok(buf.map_samples(|sample| saturate(mean + factor * (sample as f32 - mean))))
}

/// Mean luma of the buffer; 0.0 for an empty buffer.
pub fn mean_intensity(buf: &PixelBuffer) -> f64 {
    let (sum, count) = match buf {
        PixelBuffer::Gray(gray) => (
            gray.as_raw().iter().map(|&s| s as u64).sum::<u64>(),
            gray.as_raw().len() as u64,
        ),
        PixelBuffer::Rgb(rgb) => (
            rgb.pixels()
                .map(|&Rgb([r, g, b])| luma(r, g, b) as u64)
                .sum::<u64>(),
            rgb.width() as u64 * rgb.height() as u64,
        ),
    };
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn gradient_rgb() -> PixelBuffer {
        PixelBuffer::Rgb(RgbImage::from_fn(16, 8, |x, y| {
            Rgb([(x * 16) as u8, (y * 32) as u8, ((x + y) * 10) as u8])
        }))
    }

    #[test]
    fn luma_weights_cover_full_range() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn grayscale_yields_one_channel() {
        let gray = grayscale(&gradient_rgb());
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.dimensions(), (16, 8));
    }

    #[test]
    fn grayscale_twice_is_idempotent() {
        let once = grayscale(&gradient_rgb());
        let twice = grayscale(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn unit_brightness_is_identity() {
        let buf = gradient_rgb();
        assert_eq!(adjust_brightness(&buf, 1.0).unwrap(), buf);
    }

    #[test]
    fn unit_contrast_is_identity() {
        let buf = gradient_rgb();
        assert_eq!(adjust_contrast(&buf, 1.0).unwrap(), buf);
        let gray = grayscale(&buf);
        assert_eq!(adjust_contrast(&gray, 1.0).unwrap(), gray);
    }

    #[test]
    fn brightness_saturates_at_white() {
        let white = PixelBuffer::Rgb(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])));
        let out = adjust_brightness(&white, 2.0).unwrap();
        assert!(out.as_raw().iter().all(|&s| s == 255));
    }

    #[test]
    fn brightness_keeps_black_black() {
        let black = PixelBuffer::Rgb(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        let out = adjust_brightness(&black, 0.1).unwrap();
        assert!(out.as_raw().iter().all(|&s| s == 0));
    }

    #[test]
    fn brightness_halves_samples() {
        let buf = PixelBuffer::Gray(GrayImage::from_pixel(2, 2, Luma([200u8])));
        let out = adjust_brightness(&buf, 0.5).unwrap();
        assert_eq!(out.as_raw(), &[100u8; 4]);
    }

    #[test]
    fn brightness_rejects_non_positive_factor() {
        let buf = gradient_rgb();
        assert!(matches!(
            adjust_brightness(&buf, 0.0),
            Err(BildwerkError::InvalidParameter(_))
        ));
        assert!(adjust_brightness(&buf, -1.0).is_err());
        assert!(adjust_brightness(&buf, f32::NAN).is_err());
    }

    #[test]
    fn contrast_extremes_stay_in_range() {
        // Half black, half white: mean 127.5 rounds to 128.
        let buf = PixelBuffer::Gray(GrayImage::from_fn(4, 1, |x, _| {
            Luma([if x < 2 { 0 } else { 255 }])
        }));
        let out = adjust_contrast(&buf, 2.0).unwrap();
        assert_eq!(out.as_raw(), &[0, 0, 255, 255]);
    }

    #[test]
    fn zero_contrast_flattens_to_mean() {
        let buf = PixelBuffer::Gray(GrayImage::from_fn(4, 1, |x, _| Luma([(x * 20) as u8])));
        let out = adjust_contrast(&buf, 0.0).unwrap();
        // Samples 0, 20, 40, 60 have mean 30.
        assert_eq!(out.as_raw(), &[30u8; 4]);
    }

    #[test]
    fn contrast_pivots_colour_channels_on_luma_mean() {
        let buf = PixelBuffer::Rgb(RgbImage::from_pixel(2, 2, Rgb([200, 100, 50])));
        let mean = mean_intensity(&buf).round() as f32;
        let out = adjust_contrast(&buf, 0.5).unwrap();
        let expected = [
            saturate(mean + 0.5 * (200.0 - mean)),
            saturate(mean + 0.5 * (100.0 - mean)),
            saturate(mean + 0.5 * (50.0 - mean)),
        ];
        assert_eq!(&out.as_raw()[..3], &expected);
    }

    #[test]
    fn mean_of_empty_buffer_is_zero() {
        let empty = PixelBuffer::Gray(GrayImage::new(0, 0));
        assert_eq!(mean_intensity(&empty), 0.0);
    }
}
