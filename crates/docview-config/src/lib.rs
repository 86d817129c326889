//! Configuration management for docview.
//!
//! Parses `docview.toml` with serde and discovers it in the current directory
//! or any parent when no explicit path is given.
//!
//! ```toml
//! [docs]
//! source_dir = "docs"
//! output_dir = "${DOCVIEW_OUT:-build}"
//!
//! [build]
//! extension = "html"
//! ```
//!
//! Relative paths resolve against the directory holding the config file.
//! `docs.source_dir` and `docs.output_dir` support `${VAR}` and
//! `${VAR:-default}` expansion. CLI settings are applied last via
//! [`CliSettings`].

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use expand::expand_env;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override fragment output directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docview.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation paths as written in TOML.
    docs: DocsConfigRaw,
    /// Batch build settings.
    pub build: BuildSettings,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved documentation paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory containing markdown pages.
    pub source_dir: PathBuf,
    /// Directory receiving rendered HTML fragments.
    pub output_dir: PathBuf,
}

/// Settings from the `[build]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Extension of written fragment files, without the dot.
    pub extension: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            extension: "html".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.output_dir`").
        field: String,
        /// Error message (e.g., "${`DOCVIEW_OUT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `docview.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        discover_config_from(&cwd)
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            build: BuildSettings::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("build"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(source_dir) = &self.docs.source_dir {
            self.docs.source_dir = Some(expand_env(source_dir, "docs.source_dir")?);
        }
        if let Some(output_dir) = &self.docs.output_dir {
            self.docs.output_dir = Some(expand_env(output_dir, "docs.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = self.docs.source_dir.as_deref().unwrap_or("docs");
        let output_dir = self.docs.output_dir.as_deref().unwrap_or("build");
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(source_dir),
            output_dir: config_dir.join(output_dir),
        };
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ext = &self.build.extension;
        if ext.is_empty() {
            return Err(ConfigError::Validation(
                "build.extension cannot be empty".to_owned(),
            ));
        }
        if ext.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "build.extension must not start with '.': {ext}"
            )));
        }
        Ok(())
    }
}

/// Search `start` and its parents for the config file.
fn discover_config_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
