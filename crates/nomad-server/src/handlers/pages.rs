//! Page endpoints.
//!
//! Renders run on the blocking pool because the content client is blocking.
//! Every successful page carries an `ETag` so repeat visits can be answered
//! with `304 Not Modified`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use md5::{Digest, Md5};
use nomad_site::{DetailOutcome, NOT_FOUND_PATH, SiteError, SiteRenderer};

use crate::error::ServerError;
use crate::state::AppState;

const CACHE_CONTROL: &str = "public, max-age=60";

/// Handle GET /.
pub(crate) async fn list(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match render_blocking(&state, SiteRenderer::render_list).await {
        Ok(html) => page_response(&state, &headers, html),
        Err(e) => state.error_response(&e),
    }
}

/// Handle GET /{slug}.
pub(crate) async fn detail(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let lookup = slug.clone();
    match render_blocking(&state, move |renderer| renderer.render_detail(&lookup)).await {
        Ok(DetailOutcome::Page(html)) => page_response(&state, &headers, html),
        Ok(DetailOutcome::NotFound) => {
            tracing::debug!(slug = %slug, "Redirecting unknown slug");
            Redirect::temporary(NOT_FOUND_PATH).into_response()
        }
        Err(e) => state.error_response(&e),
    }
}

/// Handle GET /404 and unmatched paths.
pub(crate) async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    state.not_found_response()
}

/// Run a render on the blocking pool.
async fn render_blocking<T, F>(state: &AppState, render: F) -> Result<T, ServerError>
where
    F: FnOnce(&SiteRenderer) -> Result<T, SiteError> + Send + 'static,
    T: Send + 'static,
{
    let renderer = state.renderer.clone();
    Ok(tokio::task::spawn_blocking(move || render(&renderer)).await??)
}

/// Build a 200 page response, or 304 when the client copy is current.
fn page_response(state: &AppState, headers: &HeaderMap, html: String) -> Response {
    let etag = compute_etag(&state.version, &html);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_owned()),
        ],
        Html(html),
    )
        .into_response()
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
