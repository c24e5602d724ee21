/*
 * config_file.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * viewbridge.json config file loading.
 */

//! Config-file loading.
//!
//! When a `viewbridge.json` exists in the working directory it supplies
//! defaults for the run; command-line flags override it field by field.

use std::path::Path;

use anyhow::{Context, Result};

use viewbridge_core::BundleConfig;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "viewbridge.json";

/// Load a config file if it exists. A present-but-malformed file is an
/// error, not a silent fallback.
pub fn load(path: &Path) -> Result<Option<BundleConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: BundleConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(config))
}
