/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Bundle configuration for viewbridge.
 */

//! Bundle configuration.
//!
//! A [`BundleConfig`] describes exactly one bundling run. It is owned by
//! one [`Bundler`](crate::Bundler) for the duration of that run; nothing
//! in it is shared process-wide. The same struct deserializes from the
//! CLI's `viewbridge.json` config file.

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration for one bundling run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Root of the views directory. Defaults to the working directory.
    pub dir: Option<PathBuf>,

    /// Name of the template engine. Required.
    pub engine: Option<String>,

    /// Explicit view identifiers (relative paths without extension).
    pub views: Vec<String>,

    /// Compile every matching file found, ignoring markers and `views`.
    pub allviews: bool,

    /// Output file path. When absent, the bundle text is returned
    /// in-memory instead of written.
    pub output: Option<PathBuf>,

    /// Client-side namespace the compiled functions attach to.
    pub namespace: Option<String>,

    /// Override the engine's default file extension.
    pub ext: Option<String>,

    /// Include the engine's client runtime in the bundle.
    pub runtime: bool,

    /// Options forwarded to the engine's compiler.
    pub compiler_options: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            dir: None,
            engine: None,
            views: Vec::new(),
            allviews: false,
            output: None,
            namespace: None,
            ext: None,
            runtime: true,
            compiler_options: None,
        }
    }
}

/// Normalize a configured namespace.
///
/// A leading `window.` is stripped (the bundle attaches to the global
/// object already) and embedded whitespace is removed.
pub fn normalize_namespace(namespace: &str) -> String {
    let stripped: String = namespace.split_whitespace().collect();
    match stripped.get(.."window.".len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case("window.") => {
            stripped["window.".len()..].to_string()
        }
        _ => stripped,
    }
}

/// Normalize an extension override to always carry a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
