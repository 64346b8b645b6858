//! HTTP server for the visa directory.
//!
//! Serves the server-rendered pages and the embedded browser assets:
//! - `/` list page
//! - `/{slug}` detail page, redirecting to `/404` when no listing matches
//! - `/404` not-found page
//! - `/assets/{*path}` map script and stylesheet
//!
//! # Quick Start
//!
//! ```ignore
//! use nomad_server::{run_server, server_config_from_config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = nomad_config::Config::load(None, None).unwrap();
//!     let server_config = server_config_from_config(&config, "1.0.0".to_owned()).unwrap();
//!     run_server(server_config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (nomad-server)
//!                        │
//!                        ├─► Page routes ──spawn_blocking──► SiteRenderer ──► ContentClient
//!                        │
//!                        └─► /assets (nomad-assets, embedded)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use nomad_config::{ConfigError, ContentConfig};
use nomad_content::{ContentClient, ContentSource};
use nomad_site::{SiteOptions, SiteRenderer};

pub use app::create_router;
pub use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content store connection.
    pub content: ContentConfig,
    /// Page presentation options.
    pub site: SiteOptions,
    /// Application version (for cache invalidation).
    pub version: String,
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = ContentClient::new(&config.content);
    tracing::info!(
        url = client.query_url(),
        cdn = config.content.use_cdn,
        "Using content store"
    );
    let source: Arc<dyn ContentSource> = Arc::new(client);

    let state = Arc::new(AppState {
        renderer: SiteRenderer::new(source, config.site.clone()),
        version: config.version.clone(),
    });

    let app = create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the loaded configuration.
///
/// # Errors
///
/// Returns an error if the content store settings are missing or invalid.
pub fn server_config_from_config(
    config: &nomad_config::Config,
    version: String,
) -> Result<ServerConfig, ConfigError> {
    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        content: config.require_content()?,
        site: SiteOptions::from(&config.site_resolved),
        version,
    })
}
