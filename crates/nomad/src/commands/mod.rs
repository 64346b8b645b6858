//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod import;
pub(crate) mod serve;

pub(crate) use build::BuildArgs;
pub(crate) use import::ImportArgs;
pub(crate) use serve::ServeArgs;

use clap::Args;

/// Content store overrides shared by commands that fetch content.
#[derive(Args)]
pub(crate) struct ContentArgs {
    /// Content store project identifier (overrides config).
    #[arg(long, env = "NOMAD_PROJECT_ID")]
    project_id: Option<String>,

    /// Dataset name (overrides config).
    #[arg(long, env = "NOMAD_DATASET")]
    dataset: Option<String>,

    /// Pinned API version, `YYYY-MM-DD` (overrides config).
    #[arg(long, env = "NOMAD_API_VERSION")]
    api_version: Option<String>,

    /// Read from the fresh API instead of the CDN.
    #[arg(long)]
    no_cdn: bool,
}

impl ContentArgs {
    /// Apply overrides to CLI settings.
    pub(crate) fn apply(self, settings: &mut nomad_config::CliSettings) {
        settings.project_id = self.project_id;
        settings.dataset = self.dataset;
        settings.api_version = self.api_version;
        settings.use_cdn = self.no_cdn.then_some(false);
    }
}
