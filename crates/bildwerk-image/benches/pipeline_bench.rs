// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the transform pipeline in the bildwerk-image
// crate: Gaussian blur at several kernel sizes and Canny edge detection on a
// synthetic 256x256 colour image.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use bildwerk_image::PixelBuffer;
use bildwerk_image::transform::{detect_edges, gaussian_blur, grayscale};

/// Dark background with a bright rectangle and a diagonal ramp, so edge
/// detection has real work to do.
fn synthetic_image() -> PixelBuffer {
    PixelBuffer::Rgb(RgbImage::from_fn(256, 256, |x, y| {
        if (64..192).contains(&x) && (64..192).contains(&y) {
            Rgb([230, 220, 210])
        } else {
            let ramp = ((x + y) / 2) as u8;
            Rgb([ramp / 4, ramp / 3, ramp / 2])
        }
    }))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Blur the colour image with kernel sizes 3, 5 (the default) and 15.
fn bench_gaussian_blur(c: &mut Criterion) {
    let buf = synthetic_image();
    let mut group = c.benchmark_group("gaussian_blur (256x256 rgb)");
    for kernel_size in [3u32, 5, 15] {
        group.bench_function(format!("k={kernel_size}"), |b| {
            b.iter(|| {
                let out = gaussian_blur(black_box(&buf), kernel_size, 0.0).expect("blur failed");
                black_box(out);
            });
        });
    }
    group.finish();
}

/// Canny on the colour image and on its grayscale conversion.
fn bench_edge_detection(c: &mut Criterion) {
    let rgb = synthetic_image();
    let gray = grayscale(&rgb);

    c.bench_function("detect_edges (256x256 rgb)", |b| {
        b.iter(|| black_box(detect_edges(black_box(&rgb), 100.0, 200.0).expect("edges failed")));
    });
    c.bench_function("detect_edges (256x256 gray)", |b| {
        b.iter(|| black_box(detect_edges(black_box(&gray), 100.0, 200.0).expect("edges failed")));
    });
}

criterion_group!(benches, bench_gaussian_blur, bench_edge_detection);
criterion_main!(benches);
