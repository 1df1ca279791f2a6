// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{BildwerkError, Result};

/// Largest accepted Gaussian blur kernel size.
pub const MAX_BLUR_KERNEL_SIZE: u32 = 1023;

/// How decoded files are mapped onto a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Always three channels: alpha is dropped, gray is expanded.
    #[default]
    Color,
    /// Single-channel sources stay single-channel; everything else is RGB.
    Native,
}

/// Defaults and codec settings for an image session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BildwerkConfig {
    /// Kernel size used by `blur` when the caller gives none. Must be odd.
    pub blur_kernel_size: u32,
    /// Gaussian sigma for `blur`; values <= 0 derive sigma from the kernel size.
    pub blur_sigma: f32,
    /// Low hysteresis threshold for edge detection.
    pub edge_low: f32,
    /// High hysteresis threshold for edge detection.
    pub edge_high: f32,
    /// JPEG encode quality (1-100).
    pub jpeg_quality: u8,
    /// Channel mapping applied on load.
    pub load_mode: LoadMode,
}

impl Default for BildwerkConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 0.0,
            edge_low: 100.0,
            edge_high: 200.0,
            jpeg_quality: 95,
            load_mode: LoadMode::Color,
        }
    }
}

impl BildwerkConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&data)?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values no transform could run with.
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size == 0
            || self.blur_kernel_size % 2 == 0
            || self.blur_kernel_size > MAX_BLUR_KERNEL_SIZE
        {
            return Err(BildwerkError::Config(format!(
                "blur_kernel_size must be an odd number from 1 to {MAX_BLUR_KERNEL_SIZE}, got {}",
                self.blur_kernel_size
            )));
        }
        if !self.blur_sigma.is_finite() {
            return Err(BildwerkError::Config("blur_sigma must be finite".into()));
        }
        for (name, value) in [("edge_low", self.edge_low), ("edge_high", self.edge_high)] {
            if !value.is_finite() || value < 0.0 {
                return Err(BildwerkError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(BildwerkError::Config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
