//! `docview build` command implementation.

use std::path::PathBuf;

use clap::Args;
use docview_build::{BuildConfig, FragmentBuilder};
use docview_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover docview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long, env = "DOCVIEW_SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Output directory for fragments (overrides config).
    #[arg(short, long, env = "DOCVIEW_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Output: {}",
            config.docs_resolved.output_dir.display()
        ));

        let builder = FragmentBuilder::new(builder_config(&config));
        let report = builder.build()?;

        for err in &report.errors {
            output.warning(&format!("Failed: {err}"));
        }
        if !report.is_success() {
            return Err(CliError::Failed(report.errors.len()));
        }

        output.success(&format!(
            "Rendered {} page(s) to {}",
            report.written.len(),
            config.docs_resolved.output_dir.display()
        ));
        Ok(())
    }
}

/// Map loaded configuration onto the builder's inputs.
fn builder_config(config: &Config) -> BuildConfig {
    BuildConfig {
        source_dir: config.docs_resolved.source_dir.clone(),
        output_dir: config.docs_resolved.output_dir.clone(),
        extension: config.build.extension.clone(),
    }
}
