//! Quire CLI - documentation site renderer.
//!
//! Provides commands for:
//! - `nav`: Print the navigation tree as JSON
//! - `slugs`: List every slug a static build renders
//! - `render`: Render one page as JSON
//! - `build`: Render the whole site to HTML fragments

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, NavArgs, RenderArgs, SiteArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quire - documentation site renderer.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    #[command(flatten)]
    site: SiteArgs,

    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the navigation tree as JSON.
    Nav(NavArgs),
    /// List slugs rendered by a static build.
    Slugs,
    /// Render a page and print it as JSON.
    Render(RenderArgs),
    /// Render every page to the output directory.
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Nav(args) => args.execute(&cli.site, &output),
        Commands::Slugs => commands::slugs::execute(&cli.site, &output),
        Commands::Render(args) => args.execute(&cli.site, &output),
        Commands::Build(args) => args.execute(&cli.site, &output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
