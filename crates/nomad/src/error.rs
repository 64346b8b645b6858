//! CLI error types.

use nomad_config::ConfigError;
use nomad_site::SiteError;
use nomad_site::import::ImportError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Build(#[from] SiteError),

    #[error("{0}")]
    Import(#[from] ImportError),

    #[error("{0}")]
    Server(String),
}
