//! `nomad serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use nomad_config::{CliSettings, Config};
use nomad_server::{run_server, server_config_from_config};

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover nomad.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    #[command(flatten)]
    content: ContentArgs,

    /// Enable verbose output (request and content store logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let mut cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            ..CliSettings::default()
        };
        self.content.apply(&mut cli_settings);

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_config(&config, version.to_owned())?;

        output.info(&format!(
            "Starting server on {}:{}",
            server_config.host, server_config.port
        ));
        output.info(&format!(
            "Content: {} / {} (API v{})",
            server_config.content.project_id,
            server_config.content.dataset,
            server_config.content.api_version
        ));
        if server_config.content.use_cdn {
            output.info("CDN reads: enabled");
        } else {
            output.info("CDN reads: disabled");
        }

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
