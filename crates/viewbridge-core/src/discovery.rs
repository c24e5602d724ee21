/*
 * discovery.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Template file discovery.
 */

//! Template file discovery.
//!
//! Walks a views root recursively and filters to files carrying the
//! active engine's extension. Entries are visited in file-name order so
//! a given directory snapshot always yields the same candidate list
//! (bundle output is byte-for-byte reproducible).

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{BundleError, Result};

/// Recursively list all files under `root` whose name ends with
/// `extension` (case-insensitive, leading dot included).
///
/// Fails with a discovery error if `root` is missing or unreadable.
pub fn find_candidate_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            let source = e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, message)
            });
            BundleError::discovery(root, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if has_matching_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    debug!(
        "discovered {} candidate file(s) under {}",
        files.len(),
        root.display()
    );
    Ok(files)
}

/// Test a template's raw text against an engine's inclusion marker.
pub fn has_inclusion_marker(text: &str, marker: &Regex) -> bool {
    marker.is_match(text)
}

fn has_matching_extension(path: &Path, extension: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.len() > extension.len()
        && name
            .to_ascii_lowercase()
            .ends_with(&extension.to_ascii_lowercase())
}
