/*
 * engine/error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for template engines.
 */

//! Error types for template engines.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a template engine adapter.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The wrapped template library rejected the template source.
    #[error("{engine}: {message}")]
    Compile {
        /// The engine whose library rejected the source
        engine: String,
        /// The library's own error message
        message: String,
    },

    /// The engine's client runtime script could not be read.
    #[error("Failed to read {engine} runtime from {path}: {source}")]
    Runtime {
        /// The engine whose runtime is missing
        engine: String,
        /// The runtime script location that failed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Create a compile error carrying the library's message.
    pub fn compile(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compile {
            engine: engine.into(),
            message: message.into(),
        }
    }

    /// Create a runtime-read error.
    pub fn runtime(engine: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Runtime {
            engine: engine.into(),
            path: path.into(),
            source,
        }
    }
}
