// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration file resolution.

use std::path::{Path, PathBuf};

use bildwerk_core::{BildwerkConfig, Result};
use tracing::debug;

const CONFIG_FILE: &str = "config.json";

/// Return the application configuration directory. It is not created.
pub fn config_dir() -> PathBuf {
    config_base(std::env::var("XDG_CONFIG_HOME").ok(), std::env::var("HOME").ok()).join("bildwerk")
}

/// Where the configuration is read from when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Load `explicit` if given; otherwise the default file if it exists;
/// otherwise built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<BildwerkConfig> {
    if let Some(path) = explicit {
        return BildwerkConfig::load(path);
    }
    let path = default_config_path();
    if path.is_file() {
        BildwerkConfig::load(&path)
    } else {
        debug!(path = %path.display(), "No configuration file; using defaults");
        Ok(BildwerkConfig::default())
    }
}

fn config_base(xdg: Option<String>, home: Option<String>) -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Some(xdg) = xdg.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
