//! Embedded asset serving.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

const CACHE_CONTROL: &str = "public, max-age=3600";

/// Handle GET /assets/{*path}.
pub(crate) async fn get_asset(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(content) = nomad_assets::get(&path) else {
        return state.not_found_response();
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, nomad_assets::mime_for(&path)),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_owned()),
        ],
        Body::from(content.into_owned()),
    )
        .into_response()
}
