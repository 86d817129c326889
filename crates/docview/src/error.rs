//! CLI error types.

use docview_build::BuildError;
use docview_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0} page(s) failed to render")]
    Failed(usize),
}
