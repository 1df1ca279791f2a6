// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canny edge detection — Sobel gradients, non-maximum suppression and
// double-threshold hysteresis.
//
// No smoothing is applied before the gradient; blur first for noisy input.

use bildwerk_core::error::{BildwerkError, Result};
use image::{GrayImage, Luma, RgbImage};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;

/// tan(22.5°) in 1.15 fixed point.
const TAN_22_5_Q15: i64 = 13573;

/// Per-pixel classification after non-maximum suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeClass {
    Suppressed,
    Weak,
    Strong,
}

/// Gradient field: signed Sobel derivatives and their L1 magnitude.
struct Gradient {
    width: usize,
    height: usize,
    dx: Vec<i32>,
    dy: Vec<i32>,
    magnitude: Vec<i32>,
}

impl Gradient {
    /// Magnitude at `(x, y)`, zero outside the image.
    fn magnitude_at(&self, x: isize, y: isize) -> i32 {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return 0;
        }
        self.magnitude[y as usize * self.width + x as usize]
    }
}

/// Detect edges and return a single-channel map with samples 0 or 255.
///
/// `low` and `high` are the hysteresis thresholds on the L1 gradient
/// magnitude `|gx| + |gy|`. Pixels above `high` seed edges; pixels above
/// `low` join an edge when 8-connected to a seed. The thresholds are swapped
/// if given in the wrong order. Three-channel input uses, per pixel, the
/// channel with the strongest gradient.
#[instrument(skip(buf), fields(channels = buf.channels()))]
pub fn detect_edges(buf: &PixelBuffer, low: f32, high: f32) -> Result<PixelBuffer> {
    for (name, value) in [("low", low), ("high", high)] {
        if !value.is_finite() || value < 0.0 {
            return Err(BildwerkError::InvalidParameter(format!(
                "edge threshold {name} must be a non-negative number, got {value}"
            )));
        }
    }
    let (low, high) = if low > high { (high, low) } else { (low, high) };

    let (width, height) = buf.dimensions();
    if width == 0 || height == 0 {
        return Ok(PixelBuffer::Gray(GrayImage::new(width, height)));
    }

    let gradient = match buf {
        PixelBuffer::Gray(gray) => plane_gradient(gray),
        PixelBuffer::Rgb(rgb) => strongest_channel_gradient(rgb),
    };
    let classes = non_max_suppression(&gradient, low.floor() as i32, high.floor() as i32);
    let edges = hysteresis(&classes, gradient.width, gradient.height);

    let edge_count = edges.iter().filter(|&&e| e).count();
    debug!(edge_count, "Edge map built");

    let map = GrayImage::from_fn(width, height, |x, y| {
        let on = edges[y as usize * width as usize + x as usize];
        Luma([if on { 255 } else { 0 }])
    });
    Ok(PixelBuffer::Gray(map))
}

/// Sobel gradient of one 8-bit plane.
fn plane_gradient(plane: &GrayImage) -> Gradient {
    let gx = horizontal_sobel(plane);
    let gy = vertical_sobel(plane);
    let dx: Vec<i32> = gx.as_raw().iter().map(|&v| v as i32).collect();
    let dy: Vec<i32> = gy.as_raw().iter().map(|&v| v as i32).collect();
    let magnitude = dx.iter().zip(&dy).map(|(a, b)| a.abs() + b.abs()).collect();
    Gradient {
        width: plane.width() as usize,
        height: plane.height() as usize,
        dx,
        dy,
        magnitude,
    }
}

/// Per pixel, keep the gradient of whichever channel has the largest magnitude.
fn strongest_channel_gradient(rgb: &RgbImage) -> Gradient {
    let (width, height) = rgb.dimensions();
    let mut best = plane_gradient(&channel_plane(rgb, 0));
    for channel in 1..3 {
        let candidate = plane_gradient(&channel_plane(rgb, channel));
        for i in 0..(width as usize * height as usize) {
            if candidate.magnitude[i] > best.magnitude[i] {
                best.dx[i] = candidate.dx[i];
                best.dy[i] = candidate.dy[i];
                best.magnitude[i] = candidate.magnitude[i];
            }
        }
    }
    best
}

fn channel_plane(rgb: &RgbImage, channel: usize) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        Luma([rgb.get_pixel(x, y).0[channel]])
    })
}

/// Thin the gradient to local maxima along the quantised gradient direction
/// and classify survivors against the two thresholds.
fn non_max_suppression(gradient: &Gradient, low: i32, high: i32) -> Vec<EdgeClass> {
    let (width, height) = (gradient.width, gradient.height);
    let mut classes = vec![EdgeClass::Suppressed; width * height];

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let m = gradient.magnitude[i];
            if m <= low {
                continue;
            }

            let (xi, yi) = (x as isize, y as isize);
            let (dx, dy) = (gradient.dx[i] as i64, gradient.dy[i] as i64);
            let ax = dx.abs();
            let ay_shifted = dy.abs() << 15;
            let tan22 = ax * TAN_22_5_Q15;

            let is_max = if ay_shifted < tan22 {
                // Mostly horizontal gradient: compare left and right.
                m > gradient.magnitude_at(xi - 1, yi) && m >= gradient.magnitude_at(xi + 1, yi)
            } else if ay_shifted > tan22 + (ax << 16) {
                // Mostly vertical gradient: compare above and below.
                m > gradient.magnitude_at(xi, yi - 1) && m >= gradient.magnitude_at(xi, yi + 1)
            } else {
                // Diagonal: the sign of dx*dy picks which diagonal.
                let s = if (dx < 0) != (dy < 0) { -1 } else { 1 };
                m > gradient.magnitude_at(xi - s, yi - 1) && m > gradient.magnitude_at(xi + s, yi + 1)
            };

            if is_max {
                classes[i] = if m > high {
                    EdgeClass::Strong
                } else {
                    EdgeClass::Weak
                };
            }
        }
    }
    classes
}

/// Grow edges from strong pixels through 8-connected weak pixels.
fn hysteresis(classes: &[EdgeClass], width: usize, height: usize) -> Vec<bool> {
    let mut edges = vec![false; classes.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (i, class) in classes.iter().enumerate() {
        if *class == EdgeClass::Strong {
            edges[i] = true;
            stack.push(i);
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = ((i % width) as isize, (i / width) as isize);
        for ny in (y - 1)..=(y + 1) {
            for nx in (x - 1)..=(x + 1) {
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let n = ny as usize * width + nx as usize;
                if !edges[n] && classes[n] == EdgeClass::Weak {
                    edges[n] = true;
                    stack.push(n);
                }
            }
        }
    }
    edges
}
