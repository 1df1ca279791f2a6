// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the presentation layer.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how a front end presents it.

use crate::error::BildwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk hiccup or similar; trying again may work.
    Transient,
    /// User must do something first (open an image, pick another name).
    ActionRequired,
    /// Cannot be fixed by retrying: damaged file, unsupported format.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the same request could succeed.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `BildwerkError` into a `HumanError` suitable for a dialog.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        // -- Image store --
        BildwerkError::Decode { path, reason } => humanize_decode_error(path, reason),

        BildwerkError::Encode { path, reason } => {
            let lower = reason.to_ascii_lowercase();
            if lower.contains("extension") || lower.contains("format") {
                HumanError {
                    message: "The image can't be saved in that format.".into(),
                    suggestion: format!(
                        "Save with a .png or .jpg file name instead of {}.",
                        path.display()
                    ),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "The image couldn't be saved.".into(),
                    suggestion: format!(
                        "Check that the folder for {} exists and you can write to it. ({reason})",
                        path.display()
                    ),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BildwerkError::NotLoaded => HumanError {
            message: "No image is open.".into(),
            suggestion: "Open an image first, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Transform pipeline --
        BildwerkError::InvalidParameter(detail) => HumanError {
            message: "That setting isn't allowed.".into(),
            suggestion: format!("Choose a different value. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::InvalidStep(detail) => HumanError {
            message: "That editing step wasn't recognised.".into(),
            suggestion: format!(
                "Use one of grayscale, blur, edges, brightness=F, contrast=F or reset. ({detail})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Configuration / persistence --
        BildwerkError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix the setting or delete the file to use defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file couldn't be found.".into(),
                    suggestion: "Check the file name and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BildwerkError::Serialization(_) => HumanError {
            message: "A settings or recipe file isn't valid JSON.".into(),
            suggestion: "Open the file in a text editor and check its syntax.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// Decode failures are either a missing file or unusable content.
fn humanize_decode_error(path: &std::path::Path, reason: &str) -> HumanError {
    let lower = reason.to_ascii_lowercase();

    if lower.contains("no such file") || lower.contains("not found") {
        HumanError {
            message: "The image file doesn't exist.".into(),
            suggestion: format!("Check the path {} and try again.", path.display()),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("permission denied") {
        HumanError {
            message: "The image file can't be opened.".into(),
            suggestion: "You don't have permission to read it. Copy it somewhere you own and open the copy.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    }
}
