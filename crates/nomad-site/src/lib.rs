//! Page rendering and static site generation for the visa directory.
//!
//! # Architecture
//!
//! ```text
//! ContentSource ──► SiteRenderer ──► list page   (/)
//!                        │       ──► detail page (/{slug}) or NotFound (/404)
//!                        │
//!                        ├─► nomad-renderer (rich text fields)
//!                        └─► MapWidget (embedded JSON payload + map script)
//!
//! StaticSiteBuilder ──► SiteRenderer ──► index.html, {slug}/index.html, 404.html, assets/
//! ```
//!
//! Every render pass fetches fresh content; nothing is cached here.

mod builder;
mod error;
mod format;
pub mod import;
mod map;
mod model;
pub mod queries;
mod renderer;
mod template;

pub use builder::{BuildSummary, StaticSiteBuilder};
pub use error::SiteError;
pub use format::{CURRENCY_SYMBOL, format_income};
pub use map::{MAP_CENTER, MAP_ZOOM, MapWidget, Marker};
pub use model::{MapEntity, Slug, VisaDetail, VisaListing, detail_path, is_routable_slug};
pub use renderer::{DetailOutcome, NOT_FOUND_PATH, SiteOptions, SiteRenderer};
