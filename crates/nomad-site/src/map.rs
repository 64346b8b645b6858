//! World map of listings.
//!
//! The server side decides what the browser receives: a container with the
//! fixed initial view, the JSON payload, and the script tags. The payload
//! carries only entities that get a marker, so `map.js` places one marker per
//! entry and [`MapWidget::markers`] describes exactly what it will draw.

use std::fmt::Write;

use nomad_renderer::escape_html;

use crate::model::{MapEntity, detail_path};

/// Initial map center (latitude, longitude).
pub const MAP_CENTER: (f64, f64) = (20.0, 0.0);

/// Initial zoom level.
pub const MAP_ZOOM: u8 = 2;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

const LEAFLET_CSS: &str = "<link rel=\"stylesheet\" \
     href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\" \
     integrity=\"sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY=\" crossorigin=\"\">\n";
const LEAFLET_JS: &str = "<script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\" \
     integrity=\"sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo=\" crossorigin=\"\"></script>\n";

/// A marker the map script will place.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    /// Popup heading.
    pub title: String,
    /// Popup link to the detail page; `None` without a slug.
    pub href: Option<String>,
}

/// Map of a set of entities.
#[derive(Debug, Clone, Default)]
pub struct MapWidget {
    entities: Vec<MapEntity>,
}

impl MapWidget {
    #[must_use]
    pub fn new(entities: Vec<MapEntity>) -> Self {
        Self { entities }
    }

    /// Markers for every entity with both coordinates in range.
    ///
    /// Entities without coordinates are skipped silently; many listings are
    /// not geocoded yet.
    pub fn markers(&self) -> Vec<Marker> {
        self.placed()
            .map(|(entity, (latitude, longitude))| {
                let slug = entity.slug.current.as_str();
                Marker {
                    latitude,
                    longitude,
                    title: entity.country_name.clone(),
                    href: (!slug.is_empty()).then(|| detail_path(slug)),
                }
            })
            .collect()
    }

    fn placed(&self) -> impl Iterator<Item = (&MapEntity, (f64, f64))> {
        self.entities
            .iter()
            .filter_map(|entity| Some((entity, coordinates(entity)?)))
    }

    /// Tags for the page `<head>`.
    pub fn head() -> &'static str {
        LEAFLET_CSS
    }

    /// JSON payload of the entities that get a marker, safe to place inside
    /// a `<script>` element.
    pub fn payload(&self) -> String {
        let placed: Vec<&MapEntity> = self.placed().map(|(entity, _)| entity).collect();
        let json = serde_json::to_string(&placed).unwrap_or_else(|_| "[]".to_owned());
        json.replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026")
    }

    /// Container, payload and scripts for the page body.
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(1024);
        let _ = write!(
            html,
            "<div id=\"visa-map\" data-center-lat=\"{}\" data-center-lng=\"{}\" \
             data-zoom=\"{}\" data-tiles=\"{}\" data-attribution=\"{}\"></div>\n",
            MAP_CENTER.0,
            MAP_CENTER.1,
            MAP_ZOOM,
            escape_html(TILE_URL),
            escape_html(TILE_ATTRIBUTION),
        );
        let _ = write!(
            html,
            "<script type=\"application/json\" id=\"visa-map-data\">{}</script>\n",
            self.payload()
        );
        html.push_str(LEAFLET_JS);
        let _ = write!(
            html,
            "<script src=\"{}\"></script>\n",
            nomad_assets::url(nomad_assets::MAP_SCRIPT)
        );
        html
    }
}

fn coordinates(entity: &MapEntity) -> Option<(f64, f64)> {
    let latitude = entity.latitude.filter(|v| v.is_finite() && (-90.0..=90.0).contains(v))?;
    let longitude = entity
        .longitude
        .filter(|v| v.is_finite() && (-180.0..=180.0).contains(v))?;
    Some((latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Slug;
    use pretty_assertions::assert_eq;

    fn entity(slug: &str, latitude: Option<f64>, longitude: Option<f64>) -> MapEntity {
        MapEntity {
            country_name: "France".to_owned(),
            visa_name: "Talent Passport".to_owned(),
            slug: Slug::new(slug),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_single_marker_links_to_detail() {
        let widget = MapWidget::new(vec![entity("france-visa", Some(48.85), Some(2.35))]);
        assert_eq!(
            widget.markers(),
            vec![Marker {
                latitude: 48.85,
                longitude: 2.35,
                title: "France".to_owned(),
                href: Some("/france-visa".to_owned()),
            }]
        );
    }

    #[test]
    fn test_missing_longitude_places_no_marker() {
        let widget = MapWidget::new(vec![entity("france-visa", Some(48.85), None)]);
        assert!(widget.markers().is_empty());
    }

    #[test]
    fn test_out_of_range_coordinates_skipped() {
        let widget = MapWidget::new(vec![
            entity("a", Some(91.0), Some(0.0)),
            entity("b", Some(0.0), Some(-181.0)),
            entity("c", Some(f64::NAN), Some(0.0)),
            entity("d", Some(-33.9), Some(18.4)),
        ]);
        let markers = widget.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].href.as_deref(), Some("/d"));
    }

    #[test]
    fn test_marker_without_slug_has_no_link() {
        let widget = MapWidget::new(vec![entity("", Some(1.0), Some(1.0))]);
        assert_eq!(widget.markers()[0].href, None);
    }

    #[test]
    fn test_payload_matches_markers() {
        let widget = MapWidget::new(vec![
            entity("france-visa", Some(48.85), Some(2.35)),
            entity("spain", None, None),
            entity("north-pole", Some(91.0), Some(0.0)),
            entity("dateline", Some(0.0), Some(180.5)),
        ]);
        let value: serde_json::Value = serde_json::from_str(&widget.payload()).unwrap();
        let slugs: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|entry| entry["slug"]["current"].as_str())
            .collect();

        assert_eq!(slugs, vec!["france-visa"]);
        assert_eq!(widget.markers().len(), slugs.len());
    }

    #[test]
    fn test_render_omits_out_of_range_entity() {
        let html = MapWidget::new(vec![entity("north-pole", Some(91.0), Some(0.0))]).render();
        assert!(html.contains("<script type=\"application/json\" id=\"visa-map-data\">[]</script>"));
        assert!(!html.contains("north-pole"));
    }

    #[test]
    fn test_payload_cannot_close_script() {
        let mut hostile = entity("x", Some(0.0), Some(0.0));
        hostile.country_name = "</script><script>alert(1)</script>".to_owned();
        let payload = MapWidget::new(vec![hostile]).payload();

        assert!(!payload.contains("</script>"));
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value[0]["countryName"], "</script><script>alert(1)</script>");
    }

    #[test]
    fn test_render_fixed_view() {
        let html = MapWidget::new(vec![]).render();
        assert!(html.contains("data-center-lat=\"20\""));
        assert!(html.contains("data-center-lng=\"0\""));
        assert!(html.contains("data-zoom=\"2\""));
        assert!(html.contains("<script type=\"application/json\" id=\"visa-map-data\">[]</script>"));
        assert!(html.contains("src=\"/assets/map.js\""));
    }
}
