/*
 * engine/handlebars.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Handlebars engine adapter.
 */

//! Handlebars engine adapter.
//!
//! Syntax checking is delegated to the `handlebars` crate; the emitted
//! function binds the template through the Handlebars client runtime.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use super::error::EngineError;
use super::options::CompileOptions;
use super::traits::TemplateEngine;
use crate::output::js_string_literal;

// {{! @viewbridge }}
// {{!-- @viewbridge --}}
static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\{\{!(?:--)?\s*@\s*viewbridge\s*(?:--)?\}\}").expect("handlebars marker pattern")
});

/// Client runtime location inside the handlebars npm package.
const RUNTIME_SOURCE: &str = "handlebars/dist/handlebars.js";

pub struct HandlebarsEngine {
    runtime_path: PathBuf,
    runtime_cache: OnceCell<String>,
}

impl HandlebarsEngine {
    pub fn new(runtime_root: &Path) -> Self {
        Self {
            runtime_path: runtime_root.join(RUNTIME_SOURCE),
            runtime_cache: OnceCell::new(),
        }
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn name(&self) -> &str {
        "handlebars"
    }

    fn extension(&self) -> &str {
        ".hbs"
    }

    fn marker(&self) -> &Regex {
        &MARKER
    }

    fn default_options(&self) -> CompileOptions {
        CompileOptions::new()
    }

    fn compile(&self, source: &str, options: &CompileOptions) -> Result<String, EngineError> {
        // Parse and discard; the library is the syntax authority.
        let mut check = Handlebars::new();
        check
            .register_template_string("template", source)
            .map_err(|e| EngineError::compile(self.name(), e.to_string()))?;

        let compile_call = if options.is_empty() {
            format!("Handlebars.compile({})", js_string_literal(source))
        } else {
            format!(
                "Handlebars.compile({}, {})",
                js_string_literal(source),
                options.to_js_object()
            )
        };
        Ok([
            "(function() {".to_string(),
            format!("  var template = {};", compile_call),
            "  return function(data, partials) {".to_string(),
            "    return template(data, { partials: partials || {} });".to_string(),
            "  };".to_string(),
            "})()".to_string(),
        ]
        .join("\n"))
    }

    fn runtime(&self) -> Result<String, EngineError> {
        super::load_runtime(&self.runtime_cache, self.name(), &self.runtime_path)
    }
}
