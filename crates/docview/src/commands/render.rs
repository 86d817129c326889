//! `docview render` command implementation.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use docview_renderer::render_markdown;

use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin, also selected by `-`).
    file: Option<PathBuf>,

    /// Write the fragment to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = match self.file.as_deref() {
            Some(path) if path != Path::new("-") => fs::read_to_string(path)?,
            _ => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let html = render_markdown(&markdown);

        match self.output {
            Some(path) => {
                fs::write(&path, &html)?;
                tracing::info!(path = %path.display(), bytes = html.len(), "Wrote fragment");
            }
            None => write_fragment(&mut io::stdout().lock(), &html)?,
        }
        Ok(())
    }
}

/// Write a fragment followed by a newline.
fn write_fragment(out: &mut impl Write, html: &str) -> io::Result<()> {
    out.write_all(html.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}
