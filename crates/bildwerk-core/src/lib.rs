// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — Core error definitions and configuration shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;

pub use config::{BildwerkConfig, LoadMode, MAX_BLUR_KERNEL_SIZE};
pub use error::{BildwerkError, Result};
