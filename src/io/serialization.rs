// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings file deserialization.
//!
//! This module reads settings files in YAML and JSON formats, chosen by
//! file extension.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Import data from YAML format.
pub fn import_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import data from JSON format.
pub fn import_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Import from YAML or JSON depending on the file extension.
pub fn import_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let extension = path.extension().and_then(|s| s.to_str());
    match extension {
        Some("yaml") | Some("yml") => {
            import_yaml(path).with_context(|| format!("Failed to import YAML {}", path.display()))
        }
        Some("json") => {
            import_json(path).with_context(|| format!("Failed to import JSON {}", path.display()))
        }
        _ => bail!("Unsupported file extension: {:?}", extension),
    }
}
