//! `nomad build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use nomad_config::{CliSettings, Config};
use nomad_content::{ContentClient, ContentSource};
use nomad_site::{SiteOptions, SiteRenderer, StaticSiteBuilder};

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    content: ContentArgs,

    /// Path to configuration file (default: auto-discover nomad.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let mut cli_settings = CliSettings {
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        self.content.apply(&mut cli_settings);

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let content = config.require_content()?;
        let output_dir = config.site_resolved.output_dir.clone();

        output.info(&format!(
            "Content: {} / {}",
            content.project_id, content.dataset
        ));
        output.info(&format!("Output: {}", output_dir.display()));

        let source: Arc<dyn ContentSource> = Arc::new(ContentClient::new(&content));
        let renderer = SiteRenderer::new(source, SiteOptions::from(&config.site_resolved));
        let summary = StaticSiteBuilder::new(renderer).build(&output_dir)?;

        for slug in &summary.skipped {
            output.warning(&format!("Skipped listing with slug {slug:?}"));
        }
        output.success(&format!(
            "Built {} pages and {} assets to {}",
            summary.pages,
            summary.assets,
            output_dir.display()
        ));
        Ok(())
    }
}
