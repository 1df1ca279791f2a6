// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-image — Image store and transform pipeline for Bildwerk.
//
// Provides the `PixelBuffer` type, an `ImageSession` that owns the current and
// original buffers (load, save, reset), and the stateless transforms applied
// to it (grayscale, Gaussian blur, Canny edge detection, brightness and
// contrast).

pub mod buffer;
pub mod store;
pub mod transform;

// Re-export the primary types so callers can use `bildwerk_image::ImageSession` etc.
pub use buffer::PixelBuffer;
pub use store::session::{ImageSession, ImageState, SharedSession};
pub use transform::Transform;
pub use transform::recipe::Recipe;
