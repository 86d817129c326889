//! docview CLI - documentation viewer tooling.
//!
//! Provides commands for:
//! - `render`: Render one markdown file to an HTML fragment
//! - `build`: Render every page of a docs directory to fragment files

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, RenderArgs};
use output::Output;

/// docview - markdown documentation renderer.
#[derive(Parser)]
#[command(name = "docview", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file to an HTML fragment.
    Render(RenderArgs),
    /// Render all pages of a documentation directory.
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, rust_log.as_deref());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
///
/// An unparsable `RUST_LOG` also falls back to WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
