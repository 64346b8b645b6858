//! Application state.
//!
//! Shared state for all request handlers.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use nomad_site::SiteRenderer;

use crate::error::ServerError;

/// Application state shared across all handlers.
pub struct AppState {
    /// Page renderer over the content store.
    pub renderer: SiteRenderer,
    /// Application version for cache invalidation.
    pub version: String,
}

impl AppState {
    /// Log a failed render and answer with the generic error page.
    pub(crate) fn error_response(&self, error: &ServerError) -> Response {
        tracing::error!(error = %error, "Page render failed");
        (error.status(), Html(self.renderer.render_error())).into_response()
    }

    /// Not-found page with a 404 status.
    pub(crate) fn not_found_response(&self) -> Response {
        (StatusCode::NOT_FOUND, Html(self.renderer.render_not_found())).into_response()
    }
}
