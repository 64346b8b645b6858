//! HTTP client for the hosted content query API.
//!
//! Sync client built on a shared `ureq` agent. Every call is a single GET
//! against the query endpoint; there is no retry and no rate limiting, so
//! failures reach the caller unchanged.

use nomad_config::ContentConfig;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use ureq::Agent;

use crate::error::ContentError;
use crate::query::Query;
use crate::source::ContentSource;

/// Host serving fresh reads.
const API_HOST: &str = "api.sanity.io";

/// Host serving cached reads from the edge network.
const CDN_HOST: &str = "apicdn.sanity.io";

/// Longest error body kept in [`ContentError::Service`].
const MAX_ERROR_BODY: usize = 512;

/// Content query API client.
pub struct ContentClient {
    agent: Agent,
    query_url: String,
    use_cdn: bool,
}

/// Success envelope returned by the query endpoint.
#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

impl ContentClient {
    /// Create a client from validated configuration.
    ///
    /// The configured timeout bounds the whole round trip of each query.
    #[must_use]
    pub fn new(config: &ContentConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            query_url: query_url(config),
            use_cdn: config.use_cdn,
        }
    }

    /// Endpoint every query is sent to.
    #[must_use]
    pub fn query_url(&self) -> &str {
        &self.query_url
    }
}

impl ContentSource for ContentClient {
    fn fetch(&self, query: &Query) -> Result<Value, ContentError> {
        debug!(
            query_len = query.text().len(),
            params = ?query.param_names().collect::<Vec<_>>(),
            cdn = self.use_cdn,
            "Running content query"
        );

        let mut request = self
            .agent
            .get(&self.query_url)
            .header("Accept", "application/json");
        for (key, value) in query.url_pairs()? {
            request = request.query(key, value);
        }

        let response = request.call()?;
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if !(200..300).contains(&status) {
            let body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            let message = service_message(&body);
            warn!(status, message = %message, "Content query rejected");
            return Err(ContentError::Service { status, message });
        }

        let body = body_reader.read_to_string()?;
        let envelope: QueryResponse = serde_json::from_str(&body)?;
        Ok(envelope.result)
    }
}

/// Build the query endpoint URL for `config`.
fn query_url(config: &ContentConfig) -> String {
    let host = if config.use_cdn { CDN_HOST } else { API_HOST };
    format!(
        "https://{}.{}/v{}/data/query/{}",
        config.project_id, host, config.api_version, config.dataset
    )
}

/// Pull a readable message out of an error body.
///
/// The service reports `{"error": {"description": ...}}`; anything else is
/// passed through, truncated.
fn service_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        description: String,
    }

    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.description;
    }

    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_owned(),
    }
}
