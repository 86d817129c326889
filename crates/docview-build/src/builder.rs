//! Parallel fragment builder.

use std::fs;
use std::path::PathBuf;

use docview_renderer::render_markdown;
use rayon::prelude::*;

use crate::scanner::{PageRef, Scanner};
use crate::title::page_title;

/// Configuration for a batch build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory containing markdown pages.
    pub source_dir: PathBuf,
    /// Directory receiving rendered fragments.
    pub output_dir: PathBuf,
    /// Fragment file extension, without the dot.
    pub extension: String,
}

/// A successfully written fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub slug: String,
    /// First `# ` heading of the page, or a title derived from the slug.
    pub title: String,
    pub output_path: PathBuf,
    /// Size of the written HTML in bytes.
    pub bytes: usize,
}

/// Failure to read or write a single page.
#[derive(Debug, thiserror::Error)]
#[error("{slug}: {source}")]
pub struct PageError {
    pub slug: String,
    pub source: std::io::Error,
}

/// Error that aborts the whole build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a build: pages written and pages that failed.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Written fragments, in slug order.
    pub written: Vec<WrittenPage>,
    /// Per-page failures, in slug order.
    pub errors: Vec<PageError>,
}

impl BuildReport {
    /// Whether every page was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Look up a written page by slug.
    #[must_use]
    pub fn page(&self, slug: &str) -> Option<&WrittenPage> {
        self.written
            .binary_search_by(|p| p.slug.as_str().cmp(slug))
            .ok()
            .map(|idx| &self.written[idx])
    }
}

/// Renders every markdown page of a source tree to an HTML fragment file.
///
/// Output mirrors the source layout: `guide/install.md` becomes
/// `<output_dir>/guide/install.html`.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use docview_build::{BuildConfig, FragmentBuilder};
///
/// let builder = FragmentBuilder::new(BuildConfig {
///     source_dir: PathBuf::from("docs"),
///     output_dir: PathBuf::from("build"),
///     extension: "html".to_owned(),
/// });
/// let report = builder.build()?;
/// assert!(report.is_success());
/// # Ok::<(), docview_build::BuildError>(())
/// ```
pub struct FragmentBuilder {
    config: BuildConfig,
}

impl FragmentBuilder {
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Render all pages on the rayon global pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the source directory is missing or the output
    /// directory cannot be created. Failures of individual pages are
    /// collected in [`BuildReport::errors`] instead.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let source_dir = &self.config.source_dir;
        if !source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(source_dir.clone()));
        }
        fs::create_dir_all(&self.config.output_dir)?;

        let pages = Scanner::new(source_dir.clone()).scan();
        tracing::info!(
            count = pages.len(),
            source = %source_dir.display(),
            "Rendering pages"
        );

        let results: Vec<Result<WrittenPage, PageError>> =
            pages.par_iter().map(|page| self.build_page(page)).collect();

        let report = partition_results(results);
        tracing::info!(
            written = report.written.len(),
            failed = report.errors.len(),
            "Build completed"
        );
        Ok(report)
    }

    fn build_page(&self, page: &PageRef) -> Result<WrittenPage, PageError> {
        let output_path = self.fragment_path(&page.slug);
        let page_error = |source| PageError {
            slug: page.slug.clone(),
            source,
        };

        let markdown = fs::read_to_string(&page.source_path).map_err(page_error)?;
        let html = render_markdown(&markdown);

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(page_error)?;
        }
        fs::write(&output_path, &html).map_err(page_error)?;

        tracing::debug!(slug = %page.slug, bytes = html.len(), "Wrote fragment");
        Ok(WrittenPage {
            slug: page.slug.clone(),
            title: page_title(&markdown, &page.slug),
            output_path,
            bytes: html.len(),
        })
    }

    fn fragment_path(&self, slug: &str) -> PathBuf {
        let file_name = format!("{slug}.{}", self.config.extension);
        self.config.output_dir.join(file_name)
    }
}

fn partition_results(results: Vec<Result<WrittenPage, PageError>>) -> BuildReport {
    let mut report = BuildReport {
        written: Vec::with_capacity(results.len()),
        errors: Vec::new(),
    };

    for result in results {
        match result {
            Ok(page) => report.written.push(page),
            Err(e) => {
                tracing::warn!(slug = %e.slug, error = %e.source, "Failed to render page");
                report.errors.push(e);
            }
        }
    }
    report
}
