// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform pipeline — stateless pixel operations and the `Transform` value
// that names one of them with its parameters.

pub mod blur;
pub mod color;
pub mod edge;
pub mod recipe;

use std::fmt;
use std::str::FromStr;

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::BildwerkConfig;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;

pub use blur::{blur, gaussian_blur};
pub use color::{adjust_brightness, adjust_contrast, grayscale};
pub use edge::detect_edges;

/// One pipeline operation and its parameters.
///
/// Serialized with an `op` tag, e.g. `{"op": "blur", "kernel_size": 5}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Transform {
    /// RGB to a single BT.601 luma plane; no-op on gray input.
    Grayscale,
    /// Gaussian smoothing. `sigma <= 0` derives sigma from the kernel size.
    Blur {
        kernel_size: u32,
        #[serde(default)]
        sigma: f32,
    },
    /// Canny edge map with hysteresis thresholds `low`/`high`.
    EdgeDetect { low: f32, high: f32 },
    /// Multiply every sample by `factor`.
    Brightness { factor: f32 },
    /// Scale deviation from the mean intensity by `factor`.
    Contrast { factor: f32 },
}

impl Transform {
    /// Blur with the configured kernel size and sigma.
    pub fn blur_from(config: &BildwerkConfig) -> Self {
        Transform::Blur {
            kernel_size: config.blur_kernel_size,
            sigma: config.blur_sigma,
        }
    }

    /// Edge detection with the configured thresholds.
    pub fn edge_detect_from(config: &BildwerkConfig) -> Self {
        Transform::EdgeDetect {
            low: config.edge_low,
            high: config.edge_high,
        }
    }

    /// Short operation name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Grayscale => "grayscale",
            Transform::Blur { .. } => "blur",
            Transform::EdgeDetect { .. } => "edge_detect",
            Transform::Brightness { .. } => "brightness",
            Transform::Contrast { .. } => "contrast",
        }
    }

    /// Run the transform on `buf`, returning the new buffer.
    pub fn apply(&self, buf: &PixelBuffer) -> Result<PixelBuffer> {
        match *self {
            Transform::Grayscale => Ok(grayscale(buf)),
            Transform::Blur { kernel_size, sigma } => gaussian_blur(buf, kernel_size, sigma),
            Transform::EdgeDetect { low, high } => detect_edges(buf, low, high),
            Transform::Brightness { factor } => adjust_brightness(buf, factor),
            Transform::Contrast { factor } => adjust_contrast(buf, factor),
        }
    }

    /// Parse a compact step such as `blur=7` or `edges=50,150`.
    ///
    /// Omitted parameters come from `config`. Accepted names: `grayscale`
    /// (`gray`), `blur`, `edges` (`edge_detect`, `canny`), `brightness=F`,
    /// `contrast=F`.
    pub fn parse(step: &str, config: &BildwerkConfig) -> Result<Self> {
        let step = step.trim();
        let (name, args) = match step.split_once('=') {
            Some((name, args)) => (name.trim(), Some(args)),
            None => (step, None),
        };
        let values = match args {
            Some(args) => parse_numbers(step, args)?,
            None => Vec::new(),
        };

        let transform = match (name.to_ascii_lowercase().as_str(), values.as_slice()) {
            ("grayscale" | "gray", []) => Transform::Grayscale,
            ("blur", []) => Transform::blur_from(config),
            ("blur", [size]) => Transform::Blur {
                kernel_size: kernel_size(step, *size)?,
                sigma: config.blur_sigma,
            },
            ("blur", [size, sigma]) => Transform::Blur {
                kernel_size: kernel_size(step, *size)?,
                sigma: *sigma,
            },
            ("edges" | "edge_detect" | "canny", []) => Transform::edge_detect_from(config),
            ("edges" | "edge_detect" | "canny", [low, high]) => Transform::EdgeDetect {
                low: *low,
                high: *high,
            },
            ("brightness", [factor]) => Transform::Brightness { factor: *factor },
            ("contrast", [factor]) => Transform::Contrast { factor: *factor },
            _ => return Err(BildwerkError::InvalidStep(step.to_string())),
        };
        Ok(transform)
    }
}

fn parse_numbers(step: &str, args: &str) -> Result<Vec<f32>> {
    args.split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|err| BildwerkError::InvalidStep(format!("{step}: {err}")))
        })
        .collect()
}

fn kernel_size(step: &str, value: f32) -> Result<u32> {
    if value.fract() != 0.0 || value < 0.0 || value >= u32::MAX as f32 {
        return Err(BildwerkError::InvalidStep(format!(
            "{step}: kernel size must be a non-negative whole number"
        )));
    }
    Ok(value as u32)
}

impl FromStr for Transform {
    type Err = BildwerkError;

    /// Parse with default configuration values.
    fn from_str(s: &str) -> Result<Self> {
        Transform::parse(s, &BildwerkConfig::default())
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Grayscale => write!(f, "grayscale"),
            Transform::Blur { kernel_size, sigma } if *sigma > 0.0 => {
                write!(f, "blur={kernel_size},{sigma}")
            }
            Transform::Blur { kernel_size, .. } => write!(f, "blur={kernel_size}"),
            Transform::EdgeDetect { low, high } => write!(f, "edges={low},{high}"),
            Transform::Brightness { factor } => write!(f, "brightness={factor}"),
            Transform::Contrast { factor } => write!(f, "contrast={factor}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn bare_names_use_defaults() {
        assert_eq!("grayscale".parse::<Transform>().unwrap(), Transform::Grayscale);
        assert_eq!(
            "blur".parse::<Transform>().unwrap(),
            Transform::Blur { kernel_size: 5, sigma: 0.0 }
        );
        assert_eq!(
            "edges".parse::<Transform>().unwrap(),
            Transform::EdgeDetect { low: 100.0, high: 200.0 }
        );
    }

    #[test]
    fn parameters_override_config() {
        let config = BildwerkConfig {
            blur_kernel_size: 9,
            ..BildwerkConfig::default()
        };
        assert_eq!(
            Transform::parse("blur", &config).unwrap(),
            Transform::Blur { kernel_size: 9, sigma: 0.0 }
        );
        assert_eq!(
            Transform::parse("blur=3,1.5", &config).unwrap(),
            Transform::Blur { kernel_size: 3, sigma: 1.5 }
        );
        assert_eq!(
            Transform::parse(" Canny=50, 150 ", &config).unwrap(),
            Transform::EdgeDetect { low: 50.0, high: 150.0 }
        );
        assert_eq!(
            Transform::parse("brightness=1.2", &config).unwrap(),
            Transform::Brightness { factor: 1.2 }
        );
    }

    #[test]
    fn malformed_steps_are_rejected() {
        for bad in ["sharpen", "brightness", "contrast=abc", "blur=2.5", "edges=10", "grayscale=1"] {
            assert!(
                matches!(bad.parse::<Transform>(), Err(BildwerkError::InvalidStep(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn huge_kernel_fails_without_aborting() {
        assert!(matches!(
            "blur=4294967295".parse::<Transform>(),
            Err(BildwerkError::InvalidStep(_))
        ));

        let from_json: Transform =
            serde_json::from_str(r#"{"op":"blur","kernel_size":4294967295}"#).unwrap();
        let buf = PixelBuffer::Gray(image::GrayImage::new(1, 1));
        assert!(matches!(
            from_json.apply(&buf),
            Err(BildwerkError::InvalidParameter(_))
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for t in [
            Transform::Grayscale,
            Transform::Blur { kernel_size: 7, sigma: 0.0 },
            Transform::Blur { kernel_size: 7, sigma: 2.5 },
            Transform::EdgeDetect { low: 30.0, high: 90.0 },
            Transform::Contrast { factor: 0.5 },
        ] {
            assert_eq!(t.to_string().parse::<Transform>().unwrap(), t);
        }
    }

    #[test]
    fn json_uses_op_tag() {
        let t: Transform = serde_json::from_str(r#"{"op":"blur","kernel_size":3}"#).unwrap();
        assert_eq!(t, Transform::Blur { kernel_size: 3, sigma: 0.0 });
        let json = serde_json::to_string(&Transform::Brightness { factor: 1.5 }).unwrap();
        assert_eq!(json, r#"{"op":"brightness","factor":1.5}"#);
    }

    #[test]
    fn apply_composes_sequentially() {
        let buf = PixelBuffer::Rgb(RgbImage::from_pixel(4, 4, Rgb([100, 100, 100])));
        let brightened = Transform::Brightness { factor: 1.5 }.apply(&buf).unwrap();
        let both = Transform::Contrast { factor: 2.0 }.apply(&brightened).unwrap();
        // Contrast pivots on the brightened mean (150), not the original (100).
        assert!(both.as_raw().iter().all(|&s| s == 150));
    }
}
