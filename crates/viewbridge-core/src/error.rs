//! Error types for viewbridge-core

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Errors that can occur during a bundling run.
///
/// Every failure is fatal to the run: there are no internal retries and
/// no partial bundle is ever written. The variants distinguish where in
/// the pipeline the run died.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Invalid configuration, rejected before any file-system access.
    #[error("{0}")]
    Config(String),

    /// The views root could not be walked.
    #[error("Failed to scan views directory {path}: {source}")]
    Discovery {
        /// The views root that failed to walk
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An individual template (or runtime script) could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// The file that failed to read
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The wrapped template library rejected a template's source.
    #[error("Failed to compile template {path}: {source}")]
    Compile {
        /// The template file whose source was rejected
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    /// The output file could not be written.
    #[error("Failed to write bundle {path}: {source}")]
    Write {
        /// The requested output path
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BundleError {
    /// Create a configuration error from any message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a discovery error for the given views root.
    pub fn discovery(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Discovery {
            path: path.into(),
            source,
        }
    }

    /// Create a read error for the given file.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Attach a file path to an engine compile failure.
    pub fn compile(path: impl Into<PathBuf>, source: EngineError) -> Self {
        Self::Compile {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for the given output path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
