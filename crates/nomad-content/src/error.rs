//! Error types for content store access.

/// Error from a content query.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Request never produced a response (DNS, TLS, connection reset, timeout).
    #[error("content request failed")]
    Network(#[from] ureq::Error),

    /// The content service answered with a non-success status.
    #[error("content service error: {status} - {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Service-provided description, or the raw body.
        message: String,
    },

    /// Response body or query parameter was not valid JSON.
    #[error("invalid JSON in content exchange")]
    Json(#[from] serde_json::Error),
}

impl ContentError {
    /// HTTP status of a service error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}
