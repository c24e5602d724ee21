/*
 * engine/ejs.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * EJS engine adapter.
 */

//! EJS engine adapter.
//!
//! There is no Rust-side EJS parser, so compile never rejects source;
//! the emitted function hands the template to the EJS client library,
//! which compiles it at bundle load. The `client` option is mandatory
//! for that to produce a standalone render function, so it is pinned.

use std::path::{Path, PathBuf};

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use super::error::EngineError;
use super::options::CompileOptions;
use super::traits::TemplateEngine;
use crate::output::js_string_literal;

// <%/* @viewbridge */%>
// <%
//   //@viewbridge
// %>
static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<%\s*(?:/\*|//)\s*@\s*viewbridge\s*(?:\*/\s*)?%>").expect("ejs marker pattern")
});

/// Client runtime location inside the ejs npm package.
const RUNTIME_SOURCE: &str = "ejs/ejs.js";

pub struct EjsEngine {
    runtime_path: PathBuf,
    runtime_cache: OnceCell<String>,
}

impl EjsEngine {
    pub fn new(runtime_root: &Path) -> Self {
        Self {
            runtime_path: runtime_root.join(RUNTIME_SOURCE),
            runtime_cache: OnceCell::new(),
        }
    }
}

impl TemplateEngine for EjsEngine {
    fn name(&self) -> &str {
        "ejs"
    }

    fn extension(&self) -> &str {
        ".ejs"
    }

    fn marker(&self) -> &Regex {
        &MARKER
    }

    fn default_options(&self) -> CompileOptions {
        CompileOptions::new()
            .set("client", true)
            .set("compileDebug", false)
    }

    fn pinned_options(&self) -> CompileOptions {
        CompileOptions::new().set("client", true)
    }

    fn compile(&self, source: &str, options: &CompileOptions) -> Result<String, EngineError> {
        Ok([
            "(function() {".to_string(),
            format!(
                "  var template = ejs.compile({}, {});",
                js_string_literal(source),
                options.to_js_object()
            ),
            "  return function(data, partials) {".to_string(),
            "    return template(data);".to_string(),
            "  };".to_string(),
            "})()".to_string(),
        ]
        .join("\n"))
    }

    fn runtime(&self) -> Result<String, EngineError> {
        super::load_runtime(&self.runtime_cache, self.name(), &self.runtime_path)
    }
}
