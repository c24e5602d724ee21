/*
 * bundle.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Bundle command implementation
 */

//! Bundle command implementation.
//!
//! Merges the config file (when present) with command-line flags,
//! runs the assembler, and reports the result: the output file path on
//! stdout when one was configured, otherwise the bundle text itself.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use viewbridge_core::{BundleConfig, Bundler, EngineRegistry};

use crate::config_file;

/// Arguments for the bundle command
#[derive(Debug, Default)]
pub struct BundleArgs {
    /// Root of the views directory
    pub dir: Option<String>,
    /// Template engine name
    pub engine: Option<String>,
    /// Comma-separated view identifiers
    pub views: Option<String>,
    /// Compile every matching template found
    pub allviews: bool,
    /// Output file path
    pub output: Option<String>,
    /// Client-side namespace
    pub namespace: Option<String>,
    /// Extension override
    pub ext: Option<String>,
    /// Suppress the engine runtime in the bundle
    pub no_runtime: bool,
    /// Compiler options as a JSON object
    pub compiler_options: Option<String>,
}

/// Execute the bundle command
pub fn execute(args: BundleArgs) -> Result<()> {
    let file_config = config_file::load(Path::new(config_file::CONFIG_FILE))?;
    let config = merge(file_config.unwrap_or_default(), &args)?;

    let registry = EngineRegistry::new();

    // tokio::fs needs the tokio reactor, so build a full runtime here.
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let output = runtime.block_on(async { Bundler::new(config, &registry).generate().await })?;

    match &output.output_path {
        Some(path) => println!("{}", path.display()),
        None => print!("{}", output.javascript),
    }
    Ok(())
}

/// Overlay command-line flags onto the config-file values. A flag given
/// on the command line always wins.
fn merge(mut config: BundleConfig, args: &BundleArgs) -> Result<BundleConfig> {
    if let Some(dir) = &args.dir {
        config.dir = Some(PathBuf::from(dir));
    }
    if let Some(engine) = &args.engine {
        config.engine = Some(engine.clone());
    }
    if let Some(views) = &args.views {
        config.views = views
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
    }
    if args.allviews {
        config.allviews = true;
    }
    if let Some(output) = &args.output {
        config.output = Some(PathBuf::from(output));
    }
    if let Some(namespace) = &args.namespace {
        config.namespace = Some(namespace.clone());
    }
    if let Some(ext) = &args.ext {
        config.ext = Some(ext.clone());
    }
    if args.no_runtime {
        config.runtime = false;
    }
    if let Some(json) = &args.compiler_options {
        let options: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)
            .context("--compiler-options must be a JSON object")?;
        config.compiler_options = Some(options);
    }
    Ok(config)
}
