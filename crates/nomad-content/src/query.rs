//! Parameterized content queries.
//!
//! Values that come from outside (a slug from the request path, say) are
//! bound as `$name` parameters. They travel as separate JSON-encoded URL
//! parameters and are never spliced into the query text.

use std::collections::BTreeMap;

use serde_json::Value;

/// A query string plus its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    text: String,
    params: BTreeMap<&'static str, Value>,
}

impl Query {
    /// Create a query without parameters.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
        }
    }

    /// Bind `value` to `$name`.
    ///
    /// `name` must be a plain identifier; it is referenced in the query text
    /// as `$name`.
    #[must_use]
    pub fn param(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        debug_assert!(is_identifier(name), "invalid parameter name: {name}");
        self.params.insert(name, value.into());
        self
    }

    /// Query text as sent to the service.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bound value of `$name`, if any.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Names of all bound parameters, sorted.
    pub fn param_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.keys().copied()
    }

    /// URL query pairs: `query=<text>` followed by `$name=<json>` per parameter.
    pub(crate) fn url_pairs(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let mut pairs = Vec::with_capacity(self.params.len() + 1);
        pairs.push(("query".to_owned(), self.text.clone()));
        for (name, value) in &self.params {
            pairs.push((format!("${name}"), serde_json::to_string(value)?));
        }
        Ok(pairs)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
