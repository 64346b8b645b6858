//! Visa documents as projected by the list and detail queries.
//!
//! The content store returns `null` for projected fields a document lacks,
//! so scalar fields accept `null` and fall back to their defaults.

use nomad_renderer::RichTextDocument;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize};

/// Characters left unescaped in a slug path segment.
const SLUG_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Slugs that would collide with fixed routes.
const RESERVED_SLUGS: &[&str] = &["404", "assets"];

/// URL-safe unique identifier of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    /// The slug value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: String,
}

impl Slug {
    #[must_use]
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}

/// Listing projection used by the list page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visa_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_monthly_income: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brief_eligibility: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: Slug,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Detail projection used by the detail page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visa_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_monthly_income: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: Slug,
    /// Rich text; `None` when the field is absent.
    #[serde(default)]
    pub full_eligibility: Option<RichTextDocument>,
    /// Rich text; `None` when the field is absent.
    #[serde(default)]
    pub application_process: Option<RichTextDocument>,
    #[serde(default)]
    pub official_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visa_duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path_to_residency: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Entry of the JSON payload handed to the browser-side map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEntity {
    pub country_name: String,
    pub visa_name: String,
    pub slug: Slug,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&VisaListing> for MapEntity {
    fn from(listing: &VisaListing) -> Self {
        Self {
            country_name: listing.country_name.clone(),
            visa_name: listing.visa_name.clone(),
            slug: listing.slug.clone(),
            latitude: listing.latitude,
            longitude: listing.longitude,
        }
    }
}

impl From<&VisaDetail> for MapEntity {
    fn from(detail: &VisaDetail) -> Self {
        Self {
            country_name: detail.country_name.clone(),
            visa_name: detail.visa_name.clone(),
            slug: detail.slug.clone(),
            latitude: detail.latitude,
            longitude: detail.longitude,
        }
    }
}

/// Path of the detail page for `slug`, percent-encoded as one segment.
///
/// ```
/// assert_eq!(nomad_site::detail_path("france-visa"), "/france-visa");
/// assert_eq!(nomad_site::detail_path("a/b c"), "/a%2Fb%20c");
/// ```
pub fn detail_path(slug: &str) -> String {
    format!("/{}", utf8_percent_encode(slug, SLUG_SEGMENT))
}

/// Whether `slug` can name a detail page in both the server and a static
/// build: ASCII letters, digits, `-` and `_`, and not a reserved route.
///
/// ```
/// assert!(nomad_site::is_routable_slug("costa-rica"));
/// assert!(!nomad_site::is_routable_slug("st.kitts"));
/// assert!(!nomad_site::is_routable_slug("assets"));
/// ```
pub fn is_routable_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !RESERVED_SLUGS.contains(&slug)
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_listing_from_projection() {
        let listing: VisaListing = serde_json::from_value(json!({
            "countryName": "Spain",
            "visaName": "Digital Nomad Visa",
            "minMonthlyIncome": 2763,
            "briefEligibility": "Remote work for foreign companies.",
            "slug": {"_type": "slug", "current": "spain"},
            "latitude": 40.4168,
            "longitude": -3.7038
        }))
        .unwrap();

        assert_eq!(listing.country_name, "Spain");
        assert_eq!(listing.min_monthly_income, 2763.0);
        assert_eq!(listing.slug, Slug::new("spain"));
        assert_eq!(listing.latitude, Some(40.4168));
    }

    #[test]
    fn test_listing_nulls_become_defaults() {
        let listing: VisaListing = serde_json::from_value(json!({
            "countryName": "Croatia",
            "visaName": null,
            "minMonthlyIncome": null,
            "briefEligibility": null,
            "slug": null,
            "latitude": null
        }))
        .unwrap();

        assert_eq!(listing.visa_name, "");
        assert_eq!(listing.min_monthly_income, 0.0);
        assert_eq!(listing.slug, Slug::default());
        assert_eq!(listing.latitude, None);
        assert_eq!(listing.longitude, None);
    }

    #[test]
    fn test_detail_rich_text_fields() {
        let detail: VisaDetail = serde_json::from_value(json!({
            "countryName": "Portugal",
            "slug": {"current": "portugal"},
            "fullEligibility": [{"_type": "block", "children": [{"_type": "span", "text": "Income"}]}],
            "applicationProcess": null,
            "pathToResidency": true
        }))
        .unwrap();

        assert_eq!(detail.full_eligibility.map(|d| d.blocks().len()), Some(1));
        assert!(detail.application_process.is_none());
        assert!(detail.path_to_residency);
        assert!(detail.official_link.is_none());
    }

    #[test]
    fn test_map_entity_payload_shape() {
        let listing = VisaListing {
            country_name: "France".to_owned(),
            visa_name: "Talent Passport".to_owned(),
            slug: Slug::new("france-visa"),
            latitude: Some(48.85),
            longitude: None,
            ..VisaListing::default()
        };

        let value = serde_json::to_value(MapEntity::from(&listing)).unwrap();
        assert_eq!(
            value,
            json!({
                "countryName": "France",
                "visaName": "Talent Passport",
                "slug": {"current": "france-visa"},
                "latitude": 48.85,
                "longitude": null
            })
        );
    }

    #[test]
    fn test_routable_slug_rule() {
        for slug in ["spain", "cabo_verde", "costa-rica", "N0mad"] {
            assert!(is_routable_slug(slug), "{slug}");
        }
        for slug in ["", "st.kitts", "São Tomé/x", "../etc", "a b", "404", "assets"] {
            assert!(!is_routable_slug(slug), "{slug}");
        }
    }

    #[test]
    fn test_detail_path_encodes_segment() {
        assert_eq!(detail_path("spain"), "/spain");
        assert_eq!(detail_path("x?y#z"), "/x%3Fy%23z");
    }
}
