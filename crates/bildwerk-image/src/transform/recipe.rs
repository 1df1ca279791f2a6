// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recipes — an ordered list of transforms stored as JSON.

use std::path::Path;

use bildwerk_core::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;
use crate::transform::Transform;

/// Transforms applied one after another, each to the previous step's output.
///
/// ```json
/// { "steps": [ { "op": "grayscale" }, { "op": "blur", "kernel_size": 5 } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub steps: Vec<Transform>,
}

impl Recipe {
    pub fn new(steps: Vec<Transform>) -> Self {
        Self { steps }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a recipe from a JSON file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let recipe = Self::from_json(&data)?;
        debug!(steps = recipe.steps.len(), "Recipe loaded");
        Ok(recipe)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Run every step on `buf`. Stops at the first failing step.
    pub fn apply(&self, buf: &PixelBuffer) -> Result<PixelBuffer> {
        let mut current = buf.clone();
        for step in &self.steps {
            current = step.apply(&current)?;
        }
        Ok(current)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
