/*
 * engine/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Template engine abstraction.
 */

//! Template engine abstraction.
//!
//! Each engine wraps exactly one third-party template compiler behind a
//! uniform interface: a file extension, an inclusion-marker pattern, a
//! compile operation producing client-callable function source, and a
//! client runtime script. Engines are registered once at process start
//! and never mutated afterward; caller compile options are merged into a
//! per-run [`CompileOptions`] value instead.

pub mod ejs;
pub mod error;
pub mod handlebars;
pub mod mustache;
pub mod options;
pub mod registry;
pub mod traits;

pub use ejs::EjsEngine;
pub use error::EngineError;
pub use handlebars::HandlebarsEngine;
pub use mustache::MustacheEngine;
pub use options::CompileOptions;
pub use registry::EngineRegistry;
pub use traits::TemplateEngine;

use std::path::Path;

use once_cell::sync::OnceCell;

/// Read an engine's client runtime script, memoizing the first
/// successful read. A failed read is not cached, so a provisioned
/// runtime is picked up on the next call.
pub(crate) fn load_runtime(
    cache: &OnceCell<String>,
    engine: &str,
    path: &Path,
) -> Result<String, EngineError> {
    cache
        .get_or_try_init(|| {
            std::fs::read_to_string(path).map_err(|e| EngineError::runtime(engine, path, e))
        })
        .cloned()
}
