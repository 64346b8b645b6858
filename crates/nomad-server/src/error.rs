//! Error types for the HTTP server.

use axum::http::StatusCode;
use nomad_site::SiteError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Rendering failed, usually because the content store did.
    #[error("Render error: {0}")]
    Render(#[from] SiteError),

    /// The blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    /// Response status for this error.
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::Render(SiteError::Content(_) | SiteError::Decode(_)) => StatusCode::BAD_GATEWAY,
            Self::Render(SiteError::Io(_)) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
