/*
 * bundle_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the bundling pipeline using tempdir fixtures.
 */

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use viewbridge_core::{BundleConfig, BundleError, Bundler, DEFAULT_NAMESPACE, EngineRegistry};

/// Write a template file under the views root, creating parents.
fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A runtime root shaped like node_modules, with stub client libraries.
fn runtime_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "handlebars/dist/handlebars.js",
        "var Handlebars = { compile: function(s) { return function() { return s; }; } };\n",
    );
    write_file(tmp.path(), "mustache/mustache.js", "var Mustache = {};\n");
    write_file(tmp.path(), "ejs/ejs.js", "var ejs = {};\n");
    tmp
}

/// Baseline config: handlebars, runtime suppressed.
fn handlebars_config(dir: &Path) -> BundleConfig {
    BundleConfig {
        dir: Some(dir.to_path_buf()),
        engine: Some("handlebars".to_string()),
        runtime: false,
        ..BundleConfig::default()
    }
}

#[tokio::test]
async fn test_explicit_views_round_trip() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "<h1>{{title}}</h1>");
    write_file(views.path(), "status/index.hbs", "<p>{{status}}</p>");
    write_file(views.path(), "status/time.hbs", "<time>{{now}}</time>");

    let config = BundleConfig {
        views: vec![
            "about".to_string(),
            "status/index".to_string(),
            "status/time".to_string(),
        ],
        namespace: Some("APP.T".to_string()),
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();

    assert_eq!(output.stats.template_count, 3);
    assert_eq!(
        output.stats.templates,
        vec!["APP.T.about", "APP.T.status.index", "APP.T.status.time"]
    );
    assert!(output.javascript.contains("APP.T.about = (function() {"));
    assert!(output.javascript.contains("APP.T.status.index = (function() {"));
    assert!(output.javascript.contains("APP.T.status.time = (function() {"));
    // Root namespace is covered by the deeper entry, so only the
    // reduced namespace remains in the bootstrap list.
    assert!(output.javascript.contains("var namespaces = ['APP.T.status'];"));
    assert!(output.javascript.contains("return APP.T;"));
    assert!(output.output_path.is_none());
}

#[tokio::test]
async fn test_two_runs_are_byte_identical() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "a.hbs", "<i>{{a}}</i>");
    write_file(views.path(), "nested/b.hbs", "<b>{{b}}</b>");

    let config = BundleConfig {
        allviews: true,
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let first = Bundler::new(config.clone(), &registry).assemble().await.unwrap();
    let second = Bundler::new(config, &registry).assemble().await.unwrap();
    assert_eq!(first.javascript, second.javascript);
}

#[tokio::test]
async fn test_marker_scan_selects_only_marked_templates() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "one.hbs", "{{! @viewbridge }}\n<p>1</p>");
    write_file(views.path(), "two.hbs", "{{!@viewbridge}}<p>2</p>");
    write_file(views.path(), "sub/three.hbs", "<p>3</p>\n{{!\n  @viewbridge\n}}");
    write_file(views.path(), "plain.hbs", "<p>no marker</p>");
    write_file(views.path(), "sub/other.hbs", "{{! just a comment }}");

    let registry = EngineRegistry::new();
    let output = Bundler::new(handlebars_config(views.path()), &registry)
        .assemble()
        .await
        .unwrap();

    assert_eq!(output.stats.template_count, 3);
    assert!(output.stats.templates.contains(&format!("{}.one", DEFAULT_NAMESPACE)));
    assert!(output.stats.templates.contains(&format!("{}.two", DEFAULT_NAMESPACE)));
    assert!(
        output
            .stats
            .templates
            .contains(&format!("{}.sub.three", DEFAULT_NAMESPACE))
    );
}

#[tokio::test]
async fn test_allviews_ignores_markers() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "a.hbs", "<p>a</p>");
    write_file(views.path(), "b.hbs", "<p>b</p>");
    write_file(views.path(), "index.hbs", "{{! @viewbridge }}<p>index</p>");

    let config = BundleConfig {
        allviews: true,
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();

    assert_eq!(output.stats.template_count, 3);
    assert_eq!(
        output.stats.templates,
        vec![
            format!("{}.a", DEFAULT_NAMESPACE),
            format!("{}.b", DEFAULT_NAMESPACE),
            format!("{}.index", DEFAULT_NAMESPACE),
        ]
    );
}

#[tokio::test]
async fn test_explicit_list_and_markers_combine_without_duplicates() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "{{! @viewbridge }}<p>about</p>");
    write_file(views.path(), "contact.hbs", "{{! @viewbridge }}<p>contact</p>");

    let config = BundleConfig {
        views: vec!["about".to_string()],
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();

    // `about` appears once even though it is both explicit and marked;
    // the explicit occurrence wins the ordering.
    assert_eq!(output.stats.template_count, 2);
    assert_eq!(
        output.stats.templates,
        vec![
            format!("{}.about", DEFAULT_NAMESPACE),
            format!("{}.contact", DEFAULT_NAMESPACE),
        ]
    );
}

#[tokio::test]
async fn test_template_count_matches_template_names() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "a.hbs", "<p>a</p>");
    write_file(views.path(), "deep/b.hbs", "<p>b</p>");

    let config = BundleConfig {
        allviews: true,
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();
    assert_eq!(output.stats.template_count, output.stats.templates.len());
    assert_eq!(output.stats.template_count, 2);
}

#[tokio::test]
async fn test_unknown_engine_fails_before_discovery() {
    let config = BundleConfig {
        dir: Some("/definitely/not/a/real/dir".into()),
        engine: Some("cheesy_poofs_zzzzzz".to_string()),
        allviews: true,
        ..BundleConfig::default()
    };
    let registry = EngineRegistry::new();
    let err = Bundler::new(config, &registry).assemble().await.unwrap_err();
    assert!(matches!(err, BundleError::Config(_)));
    assert_eq!(err.to_string(), "Requested engine is not supported");
}

#[tokio::test]
async fn test_missing_views_root_is_a_discovery_error() {
    let tmp = TempDir::new().unwrap();
    let config = handlebars_config(&tmp.path().join("no_views_here"));
    let registry = EngineRegistry::new();
    let err = Bundler::new(config, &registry).assemble().await.unwrap_err();
    assert!(matches!(err, BundleError::Discovery { .. }));
}

#[tokio::test]
async fn test_missing_explicit_view_is_a_read_error() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "<p>about</p>");

    let config = BundleConfig {
        views: vec!["about".to_string(), "missing".to_string()],
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let err = Bundler::new(config, &registry).assemble().await.unwrap_err();
    match err {
        BundleError::Read { path, .. } => {
            assert!(path.ends_with("missing.hbs"));
        }
        other => panic!("expected read error, got: {}", other),
    }
}

#[tokio::test]
async fn test_compile_failure_aborts_and_writes_nothing() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "good.hbs", "<p>{{ok}}</p>");
    write_file(views.path(), "bad.hbs", "{{#if user}}never closed");
    let deploy = TempDir::new().unwrap();
    let out_path = deploy.path().join("tmpl.js");

    let config = BundleConfig {
        allviews: true,
        output: Some(out_path.clone()),
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let err = Bundler::new(config, &registry).generate().await.unwrap_err();
    match err {
        BundleError::Compile { path, .. } => assert!(path.ends_with("bad.hbs")),
        other => panic!("expected compile error, got: {}", other),
    }
    assert!(!out_path.exists(), "no partial bundle may be written");
}

#[tokio::test]
async fn test_generate_writes_bundle_to_output_path() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "<p>{{text}}</p>");
    let deploy = TempDir::new().unwrap();
    let out_path = deploy.path().join("tmpl.js");

    let config = BundleConfig {
        views: vec!["about".to_string()],
        output: Some(out_path.clone()),
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).generate().await.unwrap();

    assert_eq!(output.output_path.as_deref(), Some(out_path.as_path()));
    let written = fs::read_to_string(&out_path).unwrap();
    assert_eq!(written, output.javascript);
}

#[tokio::test]
async fn test_runtime_is_included_when_enabled() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "<p>{{text}}</p>");
    let runtime_root = runtime_fixture();

    let config = BundleConfig {
        views: vec!["about".to_string()],
        runtime: true,
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::with_runtime_dir(runtime_root.path());
    let output = Bundler::new(config, &registry).assemble().await.unwrap();

    let runtime_at = output.javascript.find("var Handlebars =").unwrap();
    let namespaces_at = output.javascript.find("var namespaces =").unwrap();
    assert!(runtime_at < namespaces_at, "runtime precedes the bootstrap");
}

#[tokio::test]
async fn test_runtime_suppressed_when_disabled() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "<p>{{text}}</p>");
    let runtime_root = runtime_fixture();

    let config = BundleConfig {
        views: vec!["about".to_string()],
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::with_runtime_dir(runtime_root.path());
    let output = Bundler::new(config, &registry).assemble().await.unwrap();
    assert!(!output.javascript.contains("var Handlebars ="));
}

#[tokio::test]
async fn test_missing_runtime_script_is_a_read_error() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "<p>{{text}}</p>");
    let empty_runtime_root = TempDir::new().unwrap();

    let config = BundleConfig {
        views: vec!["about".to_string()],
        runtime: true,
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::with_runtime_dir(empty_runtime_root.path());
    let err = Bundler::new(config, &registry).assemble().await.unwrap_err();
    assert!(matches!(err, BundleError::Read { .. }));
}

#[tokio::test]
async fn test_extension_override_without_leading_dot() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "index.tpl", "<h2>index.tpl</h2>");

    let config = BundleConfig {
        allviews: true,
        ext: Some("tpl".to_string()),
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();
    assert_eq!(
        output.stats.templates,
        vec![format!("{}.index", DEFAULT_NAMESPACE)]
    );
}

#[tokio::test]
async fn test_deeply_nested_views_bootstrap_their_namespaces() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "user/account/info.hbs", "<ul>{{#each list}}<li>{{this}}</li>{{/each}}</ul>");

    let config = BundleConfig {
        views: vec!["user/account/info".to_string()],
        namespace: Some("APP.T".to_string()),
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();
    assert!(output.javascript.contains("var namespaces = ['APP.T.user.account'];"));
    assert!(output.javascript.contains("APP.T.user.account.info = (function() {"));
}

#[tokio::test]
async fn test_mustache_engine_end_to_end() {
    let views = TempDir::new().unwrap();
    write_file(
        views.path(),
        "greeting.mustache",
        "{{! @viewbridge }}\n<h1>Hello {{name}}!</h1>",
    );

    let config = BundleConfig {
        dir: Some(views.path().to_path_buf()),
        engine: Some("mustache".to_string()),
        runtime: false,
        ..BundleConfig::default()
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();

    assert_eq!(output.stats.template_count, 1);
    assert!(output.javascript.contains("Mustache.render(source, data, partials)"));
}

#[tokio::test]
async fn test_compiler_options_reach_the_emitted_compile_call() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "<p>{{{raw}}}</p>");

    let overrides = match serde_json::json!({"noEscape": true}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let config = BundleConfig {
        views: vec!["about".to_string()],
        compiler_options: Some(overrides),
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();
    assert!(output.javascript.contains(r#"{"noEscape":true}"#));
}

#[tokio::test]
async fn test_namespace_window_prefix_is_stripped() {
    let views = TempDir::new().unwrap();
    write_file(views.path(), "about.hbs", "<p>hi</p>");

    let config = BundleConfig {
        views: vec!["about".to_string()],
        namespace: Some("window.APP.T".to_string()),
        ..handlebars_config(views.path())
    };
    let registry = EngineRegistry::new();
    let output = Bundler::new(config, &registry).assemble().await.unwrap();
    assert_eq!(output.stats.templates, vec!["APP.T.about"]);
    assert!(!output.javascript.contains("window.APP.T.about ="));
}
