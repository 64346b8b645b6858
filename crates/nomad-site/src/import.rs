//! Conversion of scraped visa data into content store import documents.
//!
//! The scraper writes either a JSON object keyed by country or an array of
//! entries. Each entry becomes one `digitalNomadVisa` document; the output is
//! newline-delimited JSON accepted by the content store's dataset import.
//! Plain string lists become rich text lists so the detail page renders them
//! through the same path as edited content.

use std::collections::HashSet;
use std::fmt::Write;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::model::{Slug, is_routable_slug, null_as_default};
use crate::queries::DOCUMENT_TYPE;

const DEFAULT_BRIEF: &str = "Remote work visa for digital nomads";
const DEFAULT_DURATION: &str = "Check official source";

/// Error converting scraped data.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Input is not valid JSON or an entry has the wrong shape.
    #[error("invalid scraped data: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level value is neither an object nor an array.
    #[error("expected an object keyed by country or an array of entries")]
    NotACollection,

    /// Entry has no country name.
    #[error("entry {0} has no countryName")]
    MissingCountry(String),

    /// Entry yields a slug that cannot name a detail page.
    #[error("entry {label} has slug {slug:?}, which is not URL-safe")]
    InvalidSlug { label: String, slug: String },

    /// Two entries share a slug.
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),
}

/// One scraped entry. Unknown fields (scrape timestamps, source lists) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapedEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    country_name: String,
    #[serde(default)]
    slug: Option<Slug>,
    #[serde(default)]
    visa_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    min_monthly_income: f64,
    #[serde(default)]
    brief_eligibility: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    full_eligibility: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    application_process: Vec<Value>,
    #[serde(default)]
    official_link: Option<String>,
    #[serde(default)]
    visa_duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    path_to_residency: bool,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

/// Convert scraped data into import documents.
///
/// # Errors
///
/// Returns an error if the input is not a collection of entries, an entry
/// lacks a country or a URL-safe slug, or two entries share a slug.
pub fn convert_scraped(input: &Value) -> Result<Vec<Value>, ImportError> {
    let entries: Vec<(String, &Value)> = match input {
        Value::Object(map) => map.iter().map(|(key, v)| (key.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("#{i}"), v))
            .collect(),
        _ => return Err(ImportError::NotACollection),
    };

    let mut seen = HashSet::new();
    let mut documents = Vec::with_capacity(entries.len());
    for (label, value) in entries {
        let entry = ScrapedEntry::deserialize(value)?;
        let document = to_document(&label, entry)?;
        let slug = document["slug"]["current"].as_str().unwrap_or_default().to_owned();
        if !seen.insert(slug.clone()) {
            return Err(ImportError::DuplicateSlug(slug));
        }
        documents.push(document);
    }
    Ok(documents)
}

/// Serialize documents as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if a document cannot be serialized.
pub fn to_ndjson(documents: &[Value]) -> Result<String, ImportError> {
    let mut out = String::new();
    for document in documents {
        let _ = writeln!(out, "{}", serde_json::to_string(document)?);
    }
    Ok(out)
}

/// Derive a slug from a country name.
///
/// ```
/// assert_eq!(nomad_site::import::slugify("Costa Rica"), "costa-rica");
/// assert_eq!(nomad_site::import::slugify("Côte d'Ivoire"), "cte-divoire");
/// ```
pub fn slugify(name: &str) -> String {
    name.trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                Some(c.to_ascii_lowercase())
            } else {
                None
            }
        })
        .collect()
}

fn to_document(label: &str, entry: ScrapedEntry) -> Result<Value, ImportError> {
    let country = entry.country_name.trim();
    if country.is_empty() {
        return Err(ImportError::MissingCountry(label.to_owned()));
    }

    let slug = entry
        .slug
        .map(|s| s.current)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| slugify(country));
    if !is_routable_slug(&slug) {
        return Err(ImportError::InvalidSlug {
            label: label.to_owned(),
            slug,
        });
    }

    let brief = entry
        .brief_eligibility
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| brief_eligibility(&entry.full_eligibility));

    let mut doc = Map::new();
    doc.insert("_id".to_owned(), json!(format!("visa-{slug}")));
    doc.insert("_type".to_owned(), json!(DOCUMENT_TYPE));
    doc.insert("countryName".to_owned(), json!(country));
    doc.insert("slug".to_owned(), json!({"_type": "slug", "current": slug}));
    doc.insert(
        "visaName".to_owned(),
        json!(
            entry
                .visa_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("{country} Digital Nomad Visa"))
        ),
    );
    doc.insert("minMonthlyIncome".to_owned(), json!(entry.min_monthly_income));
    doc.insert("briefEligibility".to_owned(), json!(brief));
    doc.insert(
        "fullEligibility".to_owned(),
        list_blocks("eligibility", "bullet", &entry.full_eligibility),
    );
    doc.insert(
        "applicationProcess".to_owned(),
        list_blocks("process", "number", &entry.application_process),
    );
    if let Some(link) = entry.official_link.filter(|l| !l.trim().is_empty()) {
        doc.insert("officialLink".to_owned(), json!(link));
    }
    doc.insert(
        "visaDuration".to_owned(),
        json!(
            entry
                .visa_duration
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DURATION.to_owned())
        ),
    );
    doc.insert("pathToResidency".to_owned(), json!(entry.path_to_residency));
    if let Some(latitude) = entry.latitude {
        doc.insert("latitude".to_owned(), json!(latitude));
    }
    if let Some(longitude) = entry.longitude {
        doc.insert("longitude".to_owned(), json!(longitude));
    }

    Ok(Value::Object(doc))
}

/// First two criteria as sentences, or the generic summary.
fn brief_eligibility(criteria: &[Value]) -> String {
    let points: Vec<&str> = criteria
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(2)
        .collect();
    if points.is_empty() {
        DEFAULT_BRIEF.to_owned()
    } else {
        format!("{}.", points.join(". "))
    }
}

/// Rich text list with one item per string; non-string items are kept as blocks.
fn list_blocks(prefix: &str, list_item: &str, items: &[Value]) -> Value {
    let blocks = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(json!({
                "_type": "block",
                "_key": format!("{prefix}-{i}"),
                "style": "normal",
                "listItem": list_item,
                "level": 1,
                "markDefs": [],
                "children": [{
                    "_type": "span",
                    "_key": format!("{prefix}-{i}-span"),
                    "text": text.trim(),
                    "marks": []
                }]
            })),
            Value::Null => None,
            other => Some(other.clone()),
        })
        .collect();
    Value::Array(blocks)
}
