/*
 * engine/mustache.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Mustache engine adapter.
 */

//! Mustache engine adapter.
//!
//! Syntax checking is delegated to the `mustache` crate; the emitted
//! function pre-parses the source once and renders through the
//! mustache.js client runtime.

use std::path::{Path, PathBuf};

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use super::error::EngineError;
use super::options::CompileOptions;
use super::traits::TemplateEngine;
use crate::output::js_string_literal;

// {{! @viewbridge }}
// {{!
//   @viewbridge
// }}
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\{\{!\s*@\s*viewbridge\s*\}\}").expect("mustache marker pattern"));

/// Client runtime location inside the mustache npm package.
const RUNTIME_SOURCE: &str = "mustache/mustache.js";

pub struct MustacheEngine {
    runtime_path: PathBuf,
    runtime_cache: OnceCell<String>,
}

impl MustacheEngine {
    pub fn new(runtime_root: &Path) -> Self {
        Self {
            runtime_path: runtime_root.join(RUNTIME_SOURCE),
            runtime_cache: OnceCell::new(),
        }
    }
}

impl TemplateEngine for MustacheEngine {
    fn name(&self) -> &str {
        "mustache"
    }

    fn extension(&self) -> &str {
        ".mustache"
    }

    fn marker(&self) -> &Regex {
        &MARKER
    }

    fn default_options(&self) -> CompileOptions {
        CompileOptions::new()
    }

    fn compile(&self, source: &str, options: &CompileOptions) -> Result<String, EngineError> {
        mustache::compile_str(source)
            .map_err(|e| EngineError::compile(self.name(), e.to_string()))?;

        let render_call = if options.is_empty() {
            "Mustache.render(source, data, partials)".to_string()
        } else {
            format!(
                "Mustache.render(source, data, partials, {})",
                options.to_js_object()
            )
        };
        Ok([
            "(function() {".to_string(),
            format!("  var source = {};", js_string_literal(source)),
            "  Mustache.parse(source);".to_string(),
            "  return function(data, partials) {".to_string(),
            format!("    return {};", render_call),
            "  };".to_string(),
            "})()".to_string(),
        ]
        .join("\n"))
    }

    fn runtime(&self) -> Result<String, EngineError> {
        super::load_runtime(&self.runtime_cache, self.name(), &self.runtime_path)
    }
}
