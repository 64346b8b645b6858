//! Error types for page rendering and static builds.

use nomad_content::ContentError;

/// Error from rendering a page or writing the static site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Content store query failed.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Query result did not have the projected shape.
    #[error("unexpected content shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// Writing build output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
