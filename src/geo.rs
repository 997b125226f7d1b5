//! Map coordinates from embedded structured data or lat/lng marker elements

use serde_json::Value;
use tracing::{debug, warn};

use crate::markup::{text_of, Page};

const STRUCTURED_DATA_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// How the two coordinate sources are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoordinatePolicy {
    /// Marker elements always replace structured data, even when they're absent
    #[default]
    Overwrite,
    /// Structured data wins per coordinate, markers fill whichever value it lacks
    FirstFound,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coordinates {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl Coordinates {
    pub fn is_empty(&self) -> bool {
        self.lat.is_none() && self.lng.is_none()
    }
}

pub fn extract_coordinates(page: &Page, policy: CoordinatePolicy) -> Coordinates {
    let structured = from_structured_data(page);
    let markers = from_marker_elements(page);

    match policy {
        CoordinatePolicy::Overwrite => {
            // Markers replace structured data wholesale, even when they found nothing
            if !structured.is_empty() && markers.is_empty() {
                debug!("structured data coordinates replaced by empty marker result");
            }
            markers
        }
        // Merged field by field so a half-filled geo block still picks up the other marker
        CoordinatePolicy::FirstFound => Coordinates {
            lat: structured.lat.or(markers.lat),
            lng: structured.lng.or(markers.lng),
        },
    }
}

/// `geo.latitude` / `geo.longitude` from the first well-formed JSON-LD block that has them
pub fn from_structured_data(page: &Page) -> Coordinates {
    for script in page.select_all(STRUCTURED_DATA_SELECTOR) {
        let raw: String = script.text().collect();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "skipping malformed structured data block");
                continue;
            }
        };
        if let Some(coords) = find_geo(&value) {
            return coords;
        }
    }
    Coordinates::default()
}

fn find_geo(value: &Value) -> Option<Coordinates> {
    match value {
        Value::Object(map) => {
            if let Some(geo) = map.get("geo") {
                let coords = Coordinates {
                    lat: geo.get("latitude").and_then(scalar_to_string),
                    lng: geo.get("longitude").and_then(scalar_to_string),
                };
                if !coords.is_empty() {
                    return Some(coords);
                }
            }
            map.values().find_map(find_geo)
        }
        Value::Array(items) => items.iter().find_map(find_geo),
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        _ => None,
    }
}

/// Text (or `content` attribute) of `.latitude` / `.longitude` elements
pub fn from_marker_elements(page: &Page) -> Coordinates {
    let read = |css: &str| {
        let element = page.select_first(css)?;
        let text = text_of(element, "");
        let value = if text.is_empty() {
            element.value().attr("content").unwrap_or("").trim().to_string()
        } else {
            text
        };
        (!value.is_empty()).then_some(value)
    };

    Coordinates {
        lat: read(".latitude"),
        lng: read(".longitude"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_LD: &str = r#"<script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "Apartment",
         "geo": {"@type": "GeoCoordinates", "latitude": 35.6702, "longitude": "139.7026"}}
    </script>"#;

    #[test]
    fn reads_nested_geo_from_structured_data() {
        let page = Page::from_html(&format!(
            r#"<html><head><script type="application/ld+json">[{{"@graph": [{{"name": "x"}}]}}]</script>{JSON_LD}</head></html>"#
        ));
        let coords = from_structured_data(&page);
        assert_eq!(coords.lat.as_deref(), Some("35.6702"));
        assert_eq!(coords.lng.as_deref(), Some("139.7026"));
    }

    #[test]
    fn malformed_structured_data_is_ignored() {
        let page = Page::from_html(
            r#"<script type="application/ld+json">{"geo": {"latitude": 35.1,</script>"#,
        );
        assert!(from_structured_data(&page).is_empty());
    }

    #[test]
    fn reads_marker_text_and_content() {
        let page = Page::from_html(
            r#"<span class="latitude">35.65</span><meta class="longitude" content="139.70">"#,
        );
        let coords = from_marker_elements(&page);
        assert_eq!(coords.lat.as_deref(), Some("35.65"));
        assert_eq!(coords.lng.as_deref(), Some("139.70"));
    }

    #[test]
    fn overwrite_policy_discards_structured_data_without_markers() {
        let page = Page::from_html(JSON_LD);
        let coords = extract_coordinates(&page, CoordinatePolicy::Overwrite);
        assert!(coords.is_empty());
    }

    #[test]
    fn first_found_policy_keeps_structured_data() {
        let page = Page::from_html(JSON_LD);
        let coords = extract_coordinates(&page, CoordinatePolicy::FirstFound);
        assert_eq!(coords.lat.as_deref(), Some("35.6702"));
        assert_eq!(coords.lng.as_deref(), Some("139.7026"));
    }

    #[test]
    fn markers_win_under_overwrite_when_both_present() {
        let page = Page::from_html(&format!(
            r#"{JSON_LD}<div class="latitude">1.5</div><div class="longitude">2.5</div>"#
        ));
        let coords = extract_coordinates(&page, CoordinatePolicy::Overwrite);
        assert_eq!(coords.lat.as_deref(), Some("1.5"));
        let coords = extract_coordinates(&page, CoordinatePolicy::FirstFound);
        assert_eq!(coords.lat.as_deref(), Some("35.6702"));
    }

    #[test]
    fn first_found_uses_markers_when_no_structured_data() {
        let page = Page::from_html(r#"<div class="latitude">1.5</div>"#);
        let coords = extract_coordinates(&page, CoordinatePolicy::FirstFound);
        assert_eq!(coords.lat.as_deref(), Some("1.5"));
        assert_eq!(coords.lng, None);
    }

    #[test]
    fn first_found_fills_missing_coordinate_from_markers() {
        let page = Page::from_html(
            r#"<script type="application/ld+json">{"geo": {"latitude": 35.1}}</script>
            <div class="latitude">9.9</div><div class="longitude">139.7</div>"#,
        );
        let coords = extract_coordinates(&page, CoordinatePolicy::FirstFound);
        assert_eq!(coords.lat.as_deref(), Some("35.1"));
        assert_eq!(coords.lng.as_deref(), Some("139.7"));
    }
}
