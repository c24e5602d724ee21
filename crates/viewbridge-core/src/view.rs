/*
 * view.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * View resolution.
 */

//! View resolution.
//!
//! A view is one discovered or explicitly-requested template, resolved
//! to a dotted client-side function name and a template file path. Raw
//! identifiers are relative paths without extension (`status/index`);
//! resolution is deterministic and purely textual.

use std::path::{Path, PathBuf};

use crate::util::unique;

/// One template to compile into the bundle.
///
/// Created during view resolution, immutable afterward, consumed
/// exactly once during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Dotted namespace name relative to the root (`status.index`).
    pub name: String,
    /// Absolute path to the template file.
    pub path: PathBuf,
}

impl View {
    /// Resolve a raw identifier against the views root and extension.
    pub fn resolve(raw: &str, root: &Path, extension: &str) -> Self {
        let identifier = normalize_identifier(raw);
        let name = identifier.replace('/', ".");
        let mut path = root.to_path_buf();
        for segment in identifier.split('/') {
            path.push(segment);
        }
        path.as_mut_os_string().push(extension);
        Self { name, path }
    }
}

/// Normalize a raw identifier: trim whitespace, convert host path
/// separators to forward slashes, strip surrounding slashes.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim()
        .replace('\\', "/")
        .trim_matches('/')
        .to_string()
}

/// Compute the raw identifier for a discovered file: its path relative
/// to the views root, extension stripped.
///
/// Returns `None` for paths outside the root or without the expected
/// extension.
pub fn identifier_for(path: &Path, root: &Path, extension: &str) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?.to_str()?;
    if rel.len() <= extension.len()
        || !rel
            .to_ascii_lowercase()
            .ends_with(&extension.to_ascii_lowercase())
    {
        return None;
    }
    Some(normalize_identifier(&rel[..rel.len() - extension.len()]))
}

/// Turn raw identifiers into the final ordered view set.
///
/// Identifiers are normalized, empties dropped, and deduplicated by
/// exact string equality with the first occurrence winning. Two
/// distinct identifiers that normalize to the same dotted name while
/// pointing at different files are not detected; the last one compiled
/// wins in the emitted bundle.
pub fn resolve_views(identifiers: Vec<String>, root: &Path, extension: &str) -> Vec<View> {
    let normalized: Vec<String> = identifiers
        .iter()
        .map(|raw| normalize_identifier(raw))
        .filter(|id| !id.is_empty())
        .collect();
    unique(normalized)
        .into_iter()
        .map(|id| View::resolve(&id, root, extension))
        .collect()
}
