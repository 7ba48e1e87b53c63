// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings come from `$ZOOMCUT_CONFIG` if set, otherwise from
//! `zoomcut.yaml` in the working directory if present, otherwise the
//! built-in defaults. Any missing field falls back to its default.

use crate::io::serialization;
use crate::models::session::BlockDefaults;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "ZOOMCUT_CONFIG";

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "zoomcut.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial window size in logical pixels
    pub window_width: f32,
    pub window_height: f32,
    /// Minimum time between continuous redraws
    pub frame_interval_ms: u64,
    /// Length of a newly added zoom block in seconds
    pub block_length_secs: f64,
    /// Scale of a newly added zoom block
    pub block_scale: f64,
    /// How long a still image plays for, in seconds
    pub still_duration_secs: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 720.0,
            frame_interval_ms: 16,
            block_length_secs: 2.0,
            block_scale: 1.5,
            still_duration_secs: 10.0,
        }
    }
}

impl AppConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn block_defaults(&self) -> BlockDefaults {
        BlockDefaults {
            length: self.block_length_secs,
            scale: self.block_scale.clamp(1.0, 5.0),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        serialization::import_by_extension(path)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Resolve and load settings the way the application does at startup.
    pub fn load() -> Result<Self> {
        match locate(std::env::var_os(CONFIG_ENV).map(PathBuf::from)) {
            Some(path) => {
                log::info!("Loading settings from {}", path.display());
                Self::from_file(&path)
            }
            None => {
                log::debug!("No settings file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// An explicit path always wins; otherwise use the default file if it exists.
fn locate(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        fallback.exists().then_some(fallback)
    })
}
