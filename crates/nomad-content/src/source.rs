//! Content source trait.

use serde_json::Value;

use crate::error::ContentError;
use crate::query::Query;

/// Something that answers content queries with JSON.
///
/// Implementations hold no per-request state, so one instance can be shared
/// across concurrent renders behind an `Arc`.
pub trait ContentSource: Send + Sync {
    /// Run `query` and return the decoded result.
    ///
    /// A query that matches nothing returns `Value::Null` (single document)
    /// or an empty array (listing); neither is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Network`] when no response arrives and
    /// [`ContentError::Service`] when the service rejects the query.
    fn fetch(&self, query: &Query) -> Result<Value, ContentError>;
}
