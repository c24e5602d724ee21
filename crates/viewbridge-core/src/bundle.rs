/*
 * bundle.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Bundle assembly pipeline.
 */

//! Bundle assembly.
//!
//! [`Bundler`] orchestrates one bundling run in strict stage order:
//! validate configuration, determine the final view set, compute the
//! minimized namespace list, compile every view, and render the output
//! script. Within the marker-scan and compile stages the per-file reads
//! are dispatched concurrently, but results are accumulated by original
//! index so the emitted bundle does not depend on completion order. Any
//! stage failure is fatal to the run; no partial bundle is written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::DEFAULT_NAMESPACE;
use crate::config::{self, BundleConfig};
use crate::discovery;
use crate::engine::{CompileOptions, EngineError, EngineRegistry, TemplateEngine};
use crate::error::{BundleError, Result};
use crate::namespace::bootstrap_namespaces;
use crate::output::{CompiledTemplate, OutputBuilder};
use crate::view::{self, View};

/// Compilation statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleStats {
    /// Number of templates compiled into the bundle.
    pub template_count: usize,
    /// Fully qualified names of the compiled templates, in bundle order.
    pub templates: Vec<String>,
}

/// Result descriptor returned to the caller.
#[derive(Debug, Clone)]
pub struct BundleOutput {
    /// Where the bundle was written, when an output path was configured.
    pub output_path: Option<PathBuf>,
    /// The bundle text.
    pub javascript: String,
    /// Compilation statistics.
    pub stats: BundleStats,
}

/// Orchestrates one bundling run.
///
/// Owns its configuration exclusively for the duration of the run;
/// engine state is read-only and shared via the registry.
pub struct Bundler<'a> {
    config: BundleConfig,
    registry: &'a EngineRegistry,
}

impl<'a> Bundler<'a> {
    pub fn new(config: BundleConfig, registry: &'a EngineRegistry) -> Self {
        Self { config, registry }
    }

    /// Assemble the bundle in memory.
    pub async fn assemble(&self) -> Result<BundleOutput> {
        // Stage 1: validate configuration. Fails before any file-system
        // access so a bad engine name never touches the disk.
        let engine = self.resolve_engine()?;
        let dir = self.resolve_dir()?;
        let namespace = self.resolve_namespace();
        let extension = match &self.config.ext {
            Some(ext) => config::normalize_extension(ext),
            None => engine.extension().to_string(),
        };
        let options = engine.compile_options(self.config.compiler_options.as_ref());

        // Stage 2: determine the final view set.
        let views = self.resolve_views(&engine, &dir, &extension).await?;
        debug!("resolved {} view(s)", views.len());

        // Stage 3: namespace bootstrap list.
        let view_names: Vec<String> = views.iter().map(|v| v.name.clone()).collect();
        let namespaces = bootstrap_namespaces(&namespace, &view_names);

        // Stage 4: compile every view, preserving view order.
        let templates = compile_views(&views, engine.clone(), &options, &namespace).await?;
        let stats = BundleStats {
            template_count: templates.len(),
            templates: templates.iter().map(|t| t.name.clone()).collect(),
        };

        // Stage 5: render the output script.
        let runtime_js = if self.config.runtime {
            Some(engine.runtime().map_err(runtime_read_error)?)
        } else {
            None
        };
        let mut builder = OutputBuilder::new();
        builder.intro();
        if let Some(runtime_js) = &runtime_js {
            builder.runtime(engine.name(), runtime_js);
        }
        builder
            .namespaces(&namespaces)
            .templates(&templates)
            .amd(&namespace)
            .outro();

        info!(
            "bundled {} template(s) under namespace {}",
            stats.template_count, namespace
        );
        Ok(BundleOutput {
            output_path: self.config.output.clone(),
            javascript: builder.build(),
            stats,
        })
    }

    /// Assemble the bundle and write it to the configured output path,
    /// if any. The file is only touched after assembly has fully
    /// succeeded.
    pub async fn generate(&self) -> Result<BundleOutput> {
        let output = self.assemble().await?;
        if let Some(path) = &output.output_path {
            tokio::fs::write(path, &output.javascript)
                .await
                .map_err(|e| BundleError::write(path, e))?;
            debug!("wrote bundle to {}", path.display());
        }
        Ok(output)
    }

    fn resolve_engine(&self) -> Result<Arc<dyn TemplateEngine>> {
        let name = self
            .config
            .engine
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| BundleError::config("Engine is required"))?;
        self.registry
            .get(name)
            .ok_or_else(|| BundleError::config("Requested engine is not supported"))
    }

    fn resolve_dir(&self) -> Result<PathBuf> {
        match &self.config.dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir()
                .map_err(|e| BundleError::config(format!("Failed to resolve working directory: {}", e))),
        }
    }

    fn resolve_namespace(&self) -> String {
        let namespace = self
            .config
            .namespace
            .as_deref()
            .map(config::normalize_namespace)
            .unwrap_or_default();
        if namespace.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            namespace
        }
    }

    /// Determine the final view set: `allviews` compiles every
    /// candidate file; otherwise the explicit list and the
    /// marker-discovered list are concatenated and deduplicated.
    async fn resolve_views(
        &self,
        engine: &Arc<dyn TemplateEngine>,
        dir: &Path,
        extension: &str,
    ) -> Result<Vec<View>> {
        let candidates = discovery::find_candidate_files(dir, extension)?;
        let identifiers = if self.config.allviews {
            candidates
                .iter()
                .filter_map(|path| view::identifier_for(path, dir, extension))
                .collect()
        } else {
            let mut identifiers = self.config.views.clone();
            let marked = scan_markers(&candidates, engine.clone()).await?;
            identifiers.extend(
                candidates
                    .iter()
                    .zip(marked)
                    .filter(|(_, hit)| *hit)
                    .filter_map(|(path, _)| view::identifier_for(path, dir, extension)),
            );
            identifiers
        };
        Ok(view::resolve_views(identifiers, dir, extension))
    }
}

/// Test every candidate file for the engine's inclusion marker.
///
/// Reads are dispatched concurrently; the result vector lines up with
/// the input order. The first failure aborts the scan.
async fn scan_markers(
    candidates: &[PathBuf],
    engine: Arc<dyn TemplateEngine>,
) -> Result<Vec<bool>> {
    let mut handles = Vec::with_capacity(candidates.len());
    for path in candidates {
        let path = path.clone();
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| BundleError::read(&path, e))?;
            Ok::<bool, BundleError>(discovery::has_inclusion_marker(&text, engine.marker()))
        }));
    }
    let mut hits = Vec::with_capacity(candidates.len());
    for handle in handles {
        hits.push(handle.await.expect("marker scan task panicked")?);
    }
    Ok(hits)
}

/// Read and compile every view. Per-file work is dispatched
/// concurrently; compiled functions are accumulated by original view
/// index. The first failure aborts the run.
async fn compile_views(
    views: &[View],
    engine: Arc<dyn TemplateEngine>,
    options: &CompileOptions,
    namespace: &str,
) -> Result<Vec<CompiledTemplate>> {
    let mut handles = Vec::with_capacity(views.len());
    for view in views {
        let view = view.clone();
        let engine = engine.clone();
        let options = options.clone();
        let name = format!("{}.{}", namespace, view.name);
        handles.push(tokio::spawn(async move {
            let text = tokio::fs::read_to_string(&view.path)
                .await
                .map_err(|e| BundleError::read(&view.path, e))?;
            let source = engine
                .compile(&text, &options)
                .map_err(|e| BundleError::compile(&view.path, e))?;
            debug!("compiled {}", name);
            Ok::<CompiledTemplate, BundleError>(CompiledTemplate { name, source })
        }));
    }
    let mut templates = Vec::with_capacity(views.len());
    for handle in handles {
        templates.push(handle.await.expect("compile task panicked")?);
    }
    Ok(templates)
}

fn runtime_read_error(err: EngineError) -> BundleError {
    match err {
        EngineError::Runtime { path, source, .. } => BundleError::read(path, source),
        other @ EngineError::Compile { .. } => BundleError::config(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default_is_empty() {
        let stats = BundleStats::default();
        assert_eq!(stats.template_count, 0);
        assert!(stats.templates.is_empty());
    }

    #[tokio::test]
    async fn test_missing_engine_is_a_config_error() {
        let registry = EngineRegistry::new();
        let bundler = Bundler::new(BundleConfig::default(), &registry);
        let err = bundler.assemble().await.unwrap_err();
        assert_eq!(err.to_string(), "Engine is required");
    }

    #[tokio::test]
    async fn test_unknown_engine_is_a_config_error_without_fs_access() {
        let registry = EngineRegistry::new();
        let config = BundleConfig {
            engine: Some("cheesy_poofs_zzzzzz".to_string()),
            // A directory that cannot exist; the engine check must fire
            // before discovery would trip over it.
            dir: Some(PathBuf::from("/definitely/not/a/real/dir")),
            ..BundleConfig::default()
        };
        let err = Bundler::new(config, &registry).assemble().await.unwrap_err();
        assert_eq!(err.to_string(), "Requested engine is not supported");
    }

    #[tokio::test]
    async fn test_engine_name_is_trimmed_and_case_insensitive() {
        let registry = EngineRegistry::new();
        let config = BundleConfig {
            engine: Some("  HANDLEBARS ".to_string()),
            ..BundleConfig::default()
        };
        let bundler = Bundler::new(config, &registry);
        assert!(bundler.resolve_engine().is_ok());
    }

    #[test]
    fn test_namespace_falls_back_to_default() {
        let registry = EngineRegistry::new();
        let config = BundleConfig {
            namespace: Some("window.".to_string()),
            ..BundleConfig::default()
        };
        let bundler = Bundler::new(config, &registry);
        assert_eq!(bundler.resolve_namespace(), DEFAULT_NAMESPACE);
    }
}
