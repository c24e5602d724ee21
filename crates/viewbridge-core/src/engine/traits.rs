/*
 * engine/traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * TemplateEngine trait definition.
 */

//! TemplateEngine trait for compiling view templates to client JS.

use regex::Regex;

use super::error::EngineError;
use super::options::CompileOptions;

/// A pluggable adapter around one third-party template compiler.
///
/// The transformation is text-in/text-out: `compile` receives template
/// source and returns the source text of a JS function expression
/// taking `(data, partials)` and returning a markup string. Engines
/// never hand back live callables and never perform I/O during compile.
///
/// # Thread Safety
///
/// Engines must be `Send + Sync`: compile calls for different views are
/// dispatched concurrently within a bundling run.
pub trait TemplateEngine: Send + Sync {
    /// Registry lookup name. Lookups are case-insensitive.
    fn name(&self) -> &str;

    /// Default file extension, with leading dot (e.g. `.hbs`).
    ///
    /// Configuration may override this per run.
    fn extension(&self) -> &str;

    /// Inclusion-marker pattern, tested against raw template text.
    ///
    /// Must tolerate the marker anywhere in the file, with flexible
    /// internal whitespace, including across lines for comment-block
    /// style markers.
    fn marker(&self) -> &Regex;

    /// Default compile options for this engine.
    fn default_options(&self) -> CompileOptions;

    /// Options that must survive any caller override.
    ///
    /// Default: nothing pinned.
    fn pinned_options(&self) -> CompileOptions {
        CompileOptions::new()
    }

    /// Compile template source to the source text of a function
    /// expression `(data, partials) -> markup string`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Compile`] carrying the wrapped library's
    /// message when that library rejects the source. The file path is
    /// attached by the caller, not here.
    fn compile(&self, source: &str, options: &CompileOptions) -> Result<String, EngineError>;

    /// The client runtime script needed by compiled functions at
    /// execution time. Read once and memoized; a failed read is not
    /// cached.
    fn runtime(&self) -> Result<String, EngineError>;

    /// Build the effective options for one run: clone defaults, overlay
    /// caller overrides, re-assert pinned entries.
    fn compile_options(
        &self,
        overrides: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> CompileOptions {
        let mut options = self.default_options();
        if let Some(overrides) = overrides {
            options.merge(overrides);
        }
        options.pin(&self.pinned_options());
        options
    }
}

impl std::fmt::Debug for dyn TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("name", &self.name())
            .field("extension", &self.extension())
            .finish()
    }
}
