// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer — the 8-bit, row-major frame every transform reads and writes.

use bildwerk_core::LoadMode;
use image::{DynamicImage, GrayImage, RgbImage};

/// One image frame of unsigned 8-bit samples, either a single gray plane or
/// interleaved RGB.
///
/// Grayscale conversion and edge detection turn an `Rgb` buffer into a `Gray`
/// one; no transform goes the other way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelBuffer {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Map a decoded image onto a buffer according to `mode`.
    ///
    /// `LoadMode::Color` always produces three channels (alpha dropped, gray
    /// expanded). `LoadMode::Native` keeps luma sources single-channel.
    /// Sources with more than 8 bits per sample are scaled down.
    pub fn from_dynamic(image: DynamicImage, mode: LoadMode) -> Self {
        match mode {
            LoadMode::Color => Self::Rgb(image.to_rgb8()),
            LoadMode::Native if !image.color().has_color() => Self::Gray(image.to_luma8()),
            LoadMode::Native => Self::Rgb(image.to_rgb8()),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        match self {
            Self::Gray(img) => img.width(),
            Self::Rgb(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Gray(img) => img.height(),
            Self::Rgb(img) => img.height(),
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Number of samples per pixel: 1 or 3.
    pub fn channels(&self) -> u8 {
        match self {
            Self::Gray(_) => 1,
            Self::Rgb(_) => 3,
        }
    }

    /// Row-major samples, `channels()` per pixel.
    pub fn as_raw(&self) -> &[u8] {
        match self {
            Self::Gray(img) => img.as_raw(),
            Self::Rgb(img) => img.as_raw(),
        }
    }

    /// RGB form for display. Gray planes are copied into all three channels.
    pub fn to_rgb8(&self) -> RgbImage {
        match self {
            Self::Gray(img) => DynamicImage::ImageLuma8(img.clone()).to_rgb8(),
            Self::Rgb(img) => img.clone(),
        }
    }

    /// Consume the buffer and hand it to the `image` codecs.
    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Self::Gray(img) => DynamicImage::ImageLuma8(img),
            Self::Rgb(img) => DynamicImage::ImageRgb8(img),
        }
    }

    /// Mutable row-major samples.
    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        match self {
            Self::Gray(img) => &mut **img,
            Self::Rgb(img) => &mut **img,
        }
    }

    /// Copy of the buffer with `f` applied to every sample, layout unchanged.
    pub(crate) fn map_samples(&self, f: impl Fn(u8) -> u8) -> Self {
        let mut out = self.clone();
        for sample in out.samples_mut() {
            *sample = f(*sample);
        }
        out
    }
}

impl From<GrayImage> for PixelBuffer {
    fn from(img: GrayImage) -> Self {
        Self::Gray(img)
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(img: RgbImage) -> Self {
        Self::Rgb(img)
    }
}
