//! List and detail page rendering.

use std::sync::Arc;

use nomad_config::{ListingOrder, SiteConfig};
use nomad_content::ContentSource;
use serde_json::Value;

use crate::error::SiteError;
use crate::model::{VisaDetail, VisaListing};
use crate::queries::{listing_query, visa_by_slug_query};
use crate::template;

/// Route the detail flow redirects to when no listing matches.
pub const NOT_FOUND_PATH: &str = "/404";

/// Presentation options for rendered pages.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    /// Site title shown in the header and page titles.
    pub title: String,
    /// Order listings are requested in.
    pub order: ListingOrder,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self::from(&SiteConfig::default())
    }
}

impl From<&SiteConfig> for SiteOptions {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            order: config.order,
        }
    }
}

/// Result of rendering a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    /// The rendered page.
    Page(String),
    /// No listing matches; the caller redirects to [`NOT_FOUND_PATH`].
    NotFound,
}

/// Renders site pages from a content source.
///
/// Cheap to clone; clones share the source.
#[derive(Clone)]
pub struct SiteRenderer {
    source: Arc<dyn ContentSource>,
    options: SiteOptions,
}

impl SiteRenderer {
    /// Create a renderer over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, options: SiteOptions) -> Self {
        Self { source, options }
    }

    /// Presentation options.
    #[must_use]
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Fetch all listings.
    ///
    /// A `null` result is an empty directory. Entries that do not match the
    /// listing projection are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the result is not an array.
    pub fn listings(&self) -> Result<Vec<VisaListing>, SiteError> {
        let value = self.source.fetch(&listing_query(self.options.order))?;
        if value.is_null() {
            return Ok(Vec::new());
        }

        let entries: Vec<Value> = serde_json::from_value(value)?;
        let listings = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed listing");
                    None
                }
            })
            .collect();
        Ok(listings)
    }

    /// Fetch the listing with `slug`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the document does not match the
    /// detail projection.
    pub fn detail(&self, slug: &str) -> Result<Option<VisaDetail>, SiteError> {
        if slug.is_empty() {
            return Ok(None);
        }
        match self.source.fetch(&visa_by_slug_query(slug))? {
            Value::Null => Ok(None),
            value => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Render the list page from fresh content.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching the listings fails.
    pub fn render_list(&self) -> Result<String, SiteError> {
        let listings = self.listings()?;
        Ok(self.render_list_from(&listings))
    }

    /// Render the list page from already fetched listings.
    #[must_use]
    pub fn render_list_from(&self, listings: &[VisaListing]) -> String {
        template::list_page(&self.options.title, listings)
    }

    /// Render the detail page for `slug`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails. A missing listing is not an
    /// error but [`DetailOutcome::NotFound`].
    pub fn render_detail(&self, slug: &str) -> Result<DetailOutcome, SiteError> {
        let Some(detail) = self.detail(slug)? else {
            tracing::debug!(slug, "No listing for slug");
            return Ok(DetailOutcome::NotFound);
        };
        Ok(DetailOutcome::Page(self.render_detail_from(&detail)))
    }

    /// Render the detail page for an already fetched listing.
    #[must_use]
    pub fn render_detail_from(&self, detail: &VisaDetail) -> String {
        let eligibility = nomad_renderer::render(detail.full_eligibility.as_ref());
        let process = nomad_renderer::render(detail.application_process.as_ref());
        template::detail_page(&self.options.title, detail, &eligibility, &process)
    }

    /// Render the not-found page.
    #[must_use]
    pub fn render_not_found(&self) -> String {
        template::not_found_page(&self.options.title)
    }

    /// Render the generic error page.
    #[must_use]
    pub fn render_error(&self) -> String {
        template::error_page(&self.options.title)
    }
}
