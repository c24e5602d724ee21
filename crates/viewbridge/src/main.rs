//! Viewbridge CLI - Main entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config_file;

#[derive(Parser)]
#[command(name = "viewbridge")]
#[command(version)]
#[command(about = "Compile server-side view templates into a client-side JS bundle", long_about = None)]
struct Cli {
    /// Path to root of views directory (defaults to the working directory)
    #[arg(short = 'd', long)]
    dir: Option<String>,

    /// Template engine: handlebars, mustache, or ejs
    #[arg(short = 'e', long)]
    engine: Option<String>,

    /// Comma-separated views to compile (relative paths without extension)
    #[arg(short = 'v', long)]
    views: Option<String>,

    /// Compile every template found, ignoring markers and --views
    #[arg(short = 'a', long)]
    allviews: bool,

    /// Filename/path of the output JS file (omit to print the bundle)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Client-side namespace the template functions attach to
    #[arg(short = 'n', long)]
    namespace: Option<String>,

    /// Override the engine's default template extension
    #[arg(short = 'E', long)]
    ext: Option<String>,

    /// Do not include the engine's client runtime in the bundle
    #[arg(long)]
    no_runtime: bool,

    /// Compiler options forwarded to the engine, as a JSON object
    #[arg(long, value_name = "JSON")]
    compiler_options: Option<String>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viewbridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let args = commands::bundle::BundleArgs {
        dir: cli.dir,
        engine: cli.engine,
        views: cli.views,
        allviews: cli.allviews,
        output: cli.output,
        namespace: cli.namespace,
        ext: cli.ext,
        no_runtime: cli.no_runtime,
        compiler_options: cli.compiler_options,
    };

    if let Err(err) = commands::bundle::execute(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
