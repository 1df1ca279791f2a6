// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Image store --
    #[error("failed to decode image {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("failed to encode image {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },

    #[error("no image loaded")]
    NotLoaded,

    // -- Transform pipeline --
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid pipeline step: {0}")]
    InvalidStep(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BildwerkError {
    /// The file path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            BildwerkError::Decode { path, .. } | BildwerkError::Encode { path, .. } => {
                Some(path.as_path())
            }
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
