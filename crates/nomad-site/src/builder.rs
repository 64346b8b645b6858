//! Static site generation.
//!
//! Writes one directory per listing so the pages resolve under the same
//! routes the server uses:
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── assets/map.js
//! ├── assets/styles.css
//! └── {slug}/index.html
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::SiteError;
use crate::model::{Slug, VisaListing, is_routable_slug};
use crate::renderer::SiteRenderer;

/// Outcome of a static build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// HTML pages written, including the list and not-found pages.
    pub pages: usize,
    /// Asset files written.
    pub assets: usize,
    /// Slugs that produced no page.
    pub skipped: Vec<String>,
}

/// Builds the static site from a renderer.
pub struct StaticSiteBuilder {
    renderer: SiteRenderer,
}

impl StaticSiteBuilder {
    #[must_use]
    pub fn new(renderer: SiteRenderer) -> Self {
        Self { renderer }
    }

    /// Render every page into `output_dir`.
    ///
    /// Detail pages render in parallel on the global rayon pool. The list page
    /// is written last and links only the detail pages that were written.
    ///
    /// # Errors
    ///
    /// Returns an error if any content query fails or output cannot be written.
    pub fn build(&self, output_dir: &Path) -> Result<BuildSummary, SiteError> {
        fs::create_dir_all(output_dir)?;

        let listings = self.renderer.listings()?;
        tracing::info!(count = listings.len(), "Fetched listings");

        let mut summary = BuildSummary::default();
        let (slugs, mut skipped) = routable_slugs(&listings);
        let written: Vec<bool> = slugs
            .par_iter()
            .map(|slug| self.build_detail(output_dir, slug))
            .collect::<Result<_, _>>()?;
        let mut linked = HashSet::new();
        for (slug, written) in slugs.into_iter().zip(written) {
            if written {
                summary.pages += 1;
                linked.insert(slug);
            } else {
                skipped.push(slug);
            }
        }

        write_file(
            &output_dir.join("index.html"),
            self.renderer
                .render_list_from(&unlink_missing(listings, &linked))
                .as_bytes(),
        )?;
        write_file(
            &output_dir.join("404.html"),
            self.renderer.render_not_found().as_bytes(),
        )?;
        summary.pages += 2;

        summary.assets = write_assets(&output_dir.join("assets"))?;
        summary.skipped = skipped;
        Ok(summary)
    }

    /// Render one detail page; `false` if the listing vanished.
    fn build_detail(&self, output_dir: &Path, slug: &str) -> Result<bool, SiteError> {
        let Some(detail) = self.renderer.detail(slug)? else {
            tracing::warn!(slug, "Listing disappeared during build, skipping");
            return Ok(false);
        };
        let dir = output_dir.join(slug);
        fs::create_dir_all(&dir)?;
        write_file(
            &dir.join("index.html"),
            self.renderer.render_detail_from(&detail).as_bytes(),
        )?;
        tracing::debug!(slug, "Wrote detail page");
        Ok(true)
    }
}

/// Split listing slugs into those that map to a directory and those skipped.
fn routable_slugs(listings: &[VisaListing]) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut routable = Vec::new();
    let mut skipped = Vec::new();

    for listing in listings {
        let slug = listing.slug.current.as_str();
        if !is_routable_slug(slug) {
            tracing::warn!(slug, country = %listing.country_name, "Slug is not URL-safe, skipping");
            skipped.push(slug.to_owned());
        } else if !seen.insert(slug) {
            tracing::warn!(slug, "Duplicate slug, skipping");
            skipped.push(slug.to_owned());
        } else {
            routable.push(slug.to_owned());
        }
    }

    (routable, skipped)
}

/// Clear the slug of every listing without a written page so neither its
/// card nor its map marker links to it.
fn unlink_missing(listings: Vec<VisaListing>, linked: &HashSet<String>) -> Vec<VisaListing> {
    listings
        .into_iter()
        .map(|mut listing| {
            if !linked.contains(&listing.slug.current) {
                listing.slug = Slug::default();
            }
            listing
        })
        .collect()
}

fn write_assets(dir: &Path) -> Result<usize, SiteError> {
    let mut count = 0;
    for path in nomad_assets::iter() {
        let Some(data) = nomad_assets::get(&path) else {
            continue;
        };
        let target: PathBuf = dir.join(&*path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        write_file(&target, &data)?;
        count += 1;
    }
    Ok(count)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), SiteError> {
    fs::write(path, contents)?;
    Ok(())
}
