//! Content store access for the visa directory.
//!
//! The [`ContentSource`] trait is the seam between page rendering and the
//! remote content API:
//!
//! - [`ContentClient`] queries the hosted API over HTTPS
//! - [`MockContent`] serves canned results in tests (behind the `mock` feature)
//!
//! Queries are built with [`Query`], which carries user-controlled values as
//! bound parameters instead of splicing them into the query text.
//!
//! # Example
//!
//! ```ignore
//! use nomad_content::{ContentClient, ContentSource, Query};
//!
//! let client = ContentClient::new(&config.require_content()?);
//! let query = Query::new("*[_type == $type][0]").param("type", "digitalNomadVisa");
//! let value = client.fetch(&query)?;
//! ```

mod client;
mod error;
#[cfg(feature = "mock")]
mod mock;
mod query;
mod source;

pub use client::ContentClient;
pub use error::ContentError;
#[cfg(feature = "mock")]
pub use mock::MockContent;
pub use query::Query;
pub use source::ContentSource;
