// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image store — session lifecycle (load, save, reset) and file codecs.

pub mod codec;
pub mod session;

pub use session::{ImageSession, ImageState, SharedSession};
