/*
 * engine/registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Registry of available template engines.
 */

//! Registry of available template engines.
//!
//! The registry is populated by explicit registration at construction
//! and never mutated afterward. Lookup is by case-insensitive name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ejs::EjsEngine;
use super::handlebars::HandlebarsEngine;
use super::mustache::MustacheEngine;
use super::traits::TemplateEngine;

/// Environment variable overriding where client runtime scripts live.
pub const RUNTIME_DIR_ENV: &str = "VIEWBRIDGE_RUNTIME_DIR";

/// Registry of available template engines.
///
/// Designed to be created once at process start and shared across the
/// application; engines are held behind `Arc<dyn TemplateEngine>` for
/// thread-safe sharing with per-file compile tasks.
#[derive(Debug)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn TemplateEngine>>,
}

impl EngineRegistry {
    /// Create a registry with the standard engines (handlebars,
    /// mustache, ejs), resolving runtime scripts under the default
    /// runtime root.
    pub fn new() -> Self {
        Self::with_runtime_dir(default_runtime_root())
    }

    /// Create a registry with the standard engines, resolving runtime
    /// scripts under the given root.
    pub fn with_runtime_dir(runtime_root: impl Into<PathBuf>) -> Self {
        let root = runtime_root.into();
        let mut registry = Self::empty();
        registry.register(Arc::new(HandlebarsEngine::new(&root)));
        registry.register(Arc::new(MustacheEngine::new(&root)));
        registry.register(Arc::new(EjsEngine::new(&root)));
        registry
    }

    /// Create an empty registry (for testing).
    pub fn empty() -> Self {
        Self {
            engines: HashMap::new(),
        }
    }

    /// Register an engine. Replaces any engine with the same name.
    pub fn register(&mut self, engine: Arc<dyn TemplateEngine>) {
        self.engines
            .insert(engine.name().to_ascii_lowercase(), engine);
    }

    /// Get an engine by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<Arc<dyn TemplateEngine>> {
        self.engines.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Check if an engine is registered, case-insensitively.
    pub fn is_supported(&self, name: &str) -> bool {
        self.engines.contains_key(&name.to_ascii_lowercase())
    }

    /// List all registered engine names, sorted.
    pub fn engine_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engines.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered engines.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Default runtime root: `$VIEWBRIDGE_RUNTIME_DIR`, else `node_modules`
/// under the working directory (the client libraries are npm packages).
fn default_runtime_root() -> PathBuf {
    match std::env::var_os(RUNTIME_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => Path::new("node_modules").to_path_buf(),
    }
}
