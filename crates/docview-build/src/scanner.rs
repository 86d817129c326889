//! Page discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

/// A markdown page found in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    /// Page identifier: path relative to the source directory, `/`-separated,
    /// without the `.md` extension (e.g. "guide/install").
    pub slug: String,
    /// Path to the markdown file.
    pub source_path: PathBuf,
}

/// Discovers markdown pages by walking a source directory.
pub struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Scan the source directory and return pages sorted by slug.
    ///
    /// Hidden files and directories are skipped, as are entries whose names
    /// are not valid UTF-8, since they have no slug. Returns an empty Vec if the
    /// source directory doesn't exist; unreadable subdirectories are skipped.
    #[must_use]
    pub fn scan(&self) -> Vec<PageRef> {
        let mut pages = Vec::new();
        if self.source_dir.is_dir() {
            scan_directory(&self.source_dir, "", &mut pages);
        }
        pages.sort_by(|a, b| a.slug.cmp(&b.slug));
        pages
    }
}

fn scan_directory(dir_path: &Path, slug_prefix: &str, pages: &mut Vec<PageRef>) {
    let Ok(entries) = fs::read_dir(dir_path) else {
        tracing::debug!(path = %dir_path.display(), "Skipping unreadable directory");
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(path = %entry.path().display(), "Skipping non-UTF-8 name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

        if is_dir {
            let child_prefix = join_slug(slug_prefix, &name);
            scan_directory(&path, &child_prefix, pages);
        } else if let Some(stem) = name.strip_suffix(".md") {
            pages.push(PageRef {
                slug: join_slug(slug_prefix, stem),
                source_path: path,
            });
        }
    }
}

fn join_slug(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}
