//! Mock content source for testing.
//!
//! Provides [`MockContent`] for unit tests that must not reach the network.

use std::sync::RwLock;

use serde_json::Value;

use crate::error::ContentError;
use crate::query::Query;
use crate::source::ContentSource;

#[derive(Debug, Clone)]
enum Canned {
    Result(Value),
    Failure { status: u16, message: String },
}

/// Mock content source.
///
/// Answers exactly the queries it was primed with (text and parameters must
/// both match) and records every query it receives. Unknown queries fail
/// with a 400 service error so a test never silently gets `null`.
///
/// # Example
///
/// ```ignore
/// use nomad_content::{ContentSource, MockContent, Query};
///
/// let query = Query::new("*[_type == \"visa\"]");
/// let source = MockContent::new().with_result(&query, serde_json::json!([]));
/// assert_eq!(source.fetch(&query).unwrap(), serde_json::json!([]));
/// ```
#[derive(Debug, Default)]
pub struct MockContent {
    canned: RwLock<Vec<(Query, Canned)>>,
    calls: RwLock<Vec<Query>>,
}

impl MockContent {
    /// Create a mock with no canned answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `result`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_result(self, query: &Query, result: Value) -> Self {
        self.canned
            .write()
            .unwrap()
            .push((query.clone(), Canned::Result(result)));
        self
    }

    /// Answer `query` with a service error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, query: &Query, status: u16, message: impl Into<String>) -> Self {
        self.canned.write().unwrap().push((
            query.clone(),
            Canned::Failure {
                status,
                message: message.into(),
            },
        ));
        self
    }

    /// Queries received so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<Query> {
        self.calls.read().unwrap().clone()
    }
}

impl ContentSource for MockContent {
    fn fetch(&self, query: &Query) -> Result<Value, ContentError> {
        self.calls.write().unwrap().push(query.clone());

        let canned = self.canned.read().unwrap();
        match canned.iter().find(|(q, _)| q == query).map(|(_, c)| c) {
            Some(Canned::Result(value)) => Ok(value.clone()),
            Some(Canned::Failure { status, message }) => Err(ContentError::Service {
                status: *status,
                message: message.clone(),
            }),
            None => Err(ContentError::Service {
                status: 400,
                message: format!("unexpected query: {}", query.text()),
            }),
        }
    }
}
