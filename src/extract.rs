//! Assembles a [`ListingRecord`] from one fetched listing page.

use tracing::debug;

use crate::access::{extract_stations, Station, DEFAULT_STATION_LIMIT};
use crate::address::{
    extract_address_text, extract_postcode, extract_property_csv_id, split_japanese_address,
    AddressParts,
};
use crate::building::{extract_building_name, extract_year_from_text, normalize_building_type};
use crate::geo::{extract_coordinates, CoordinatePolicy};
use crate::images::{extract_images, DEFAULT_IMAGE_LIMIT};
use crate::markup::Page;
use crate::romanize::Romanizer;
use crate::side_info::{SideInfo, LABEL_BUILT, LABEL_KIND, LABEL_LOCATION};
use crate::types::{ListingRecord, StationSlot, MAX_IMAGES, MAX_STATIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub station_limit: usize,
    pub image_limit: usize,
    pub coordinate_policy: CoordinatePolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            station_limit: DEFAULT_STATION_LIMIT,
            image_limit: DEFAULT_IMAGE_LIMIT,
            coordinate_policy: CoordinatePolicy::default(),
        }
    }
}

impl ExtractOptions {
    /// Limits clamped to the record's fixed group sizes
    fn clamped(self) -> Self {
        Self {
            station_limit: self.station_limit.min(MAX_STATIONS),
            image_limit: self.image_limit.min(MAX_IMAGES),
            ..self
        }
    }
}

/// Extraction context: options plus the (optional) romanization engine
#[derive(Debug, Default)]
pub struct Extractor {
    options: ExtractOptions,
    romanizer: Romanizer,
}

impl Extractor {
    pub fn new(options: ExtractOptions, romanizer: Romanizer) -> Self {
        Self {
            options: options.clamped(),
            romanizer,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Build the record for `url` from its raw page bytes. Never fails: anything the
    /// page doesn't provide comes out as `None`.
    pub fn extract(&self, url: &str, html: &[u8]) -> ListingRecord {
        let page = Page::parse(html);
        let info = SideInfo::from_page(&page);
        debug!(labels = info.len(), "side info collected");

        let property_csv_id = extract_property_csv_id(url);
        let postcode = extract_postcode(&page);

        let address = info
            .get(LABEL_LOCATION)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .or_else(|| extract_address_text(&page));
        let parts = address
            .as_deref()
            .map(split_japanese_address)
            .unwrap_or_default();

        let building_type = normalize_building_type(info.get(LABEL_KIND));
        let year = extract_year_from_text(info.get(LABEL_BUILT));

        let name_ja = extract_building_name(&page, &info);
        let name_en = self.romanizer.to_english_name(name_ja.as_deref());

        let coords = extract_coordinates(&page, self.options.coordinate_policy);
        let stations = extract_stations(&page, self.options.station_limit);
        let images = extract_images(&page, url, self.options.image_limit);
        debug!(
            stations = stations.len(),
            images = images.len(),
            "repeated groups extracted"
        );

        let AddressParts {
            prefecture,
            city,
            district,
            remainder,
        } = parts;

        ListingRecord {
            link: url.to_string(),
            property_csv_id,
            postcode,
            prefecture,
            city,
            district,
            chome_banchi: remainder,
            building_type,
            year,
            building_name_en: name_en,
            building_name_ja: name_ja,
            map_lat: coords.lat,
            map_lng: coords.lng,
            stations: station_slots(stations),
            images: image_slots(images),
        }
    }
}

/// Build a record with default options and whatever romanization engine is compiled in
pub fn extract(url: &str, html: &[u8]) -> ListingRecord {
    Extractor::default().extract(url, html)
}

fn station_slots(stations: Vec<Station>) -> [StationSlot; MAX_STATIONS] {
    let mut stations = stations.into_iter();
    std::array::from_fn(|_| {
        stations
            .next()
            .map(|s| StationSlot {
                station_name: s.name,
                train_line_name: s.line,
                walk: s.walk_minutes.map(|m| m.to_string()),
            })
            .unwrap_or_default()
    })
}

fn image_slots(images: Vec<String>) -> [Option<String>; MAX_IMAGES] {
    let mut images = images.into_iter();
    std::array::from_fn(|_| images.next())
}
