//! Listing record and the fixed output schema

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

pub const MAX_STATIONS: usize = 5;
pub const MAX_IMAGES: usize = 16;

/// Name/description slots no extractor fills yet. They are still emitted as
/// `null` so downstream imports see a stable column set.
pub const RESERVED_NAME_FIELDS: &[&str] = &["building_name_zh_cn", "building_name_zh_tw"];
pub const RESERVED_DESCRIPTION_FIELDS: &[&str] = &[
    "building_description_en",
    "building_description_ja",
    "building_description_zh_cn",
    "building_description_zh_tw",
];
pub const RESERVED_TRAILING_FIELDS: &[&str] = &["guarantor_amount", "discount", "create_date"];

/// Building kind as an English code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingType {
    Apartment,
    House,
    Townhouse,
}

impl BuildingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingType::Apartment => "apartment",
            BuildingType::House => "house",
            BuildingType::Townhouse => "townhouse",
        }
    }

    /// Closed lookup over the native kind names; no catch-all
    pub fn from_japanese(kind: &str) -> Option<Self> {
        match kind {
            "マンション" | "アパート" => Some(BuildingType::Apartment),
            "一戸建て" | "戸建" => Some(BuildingType::House),
            "テラスハウス" | "タウンハウス" => Some(BuildingType::Townhouse),
            _ => None,
        }
    }
}

/// One nearby station as written to the record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationSlot {
    pub station_name: Option<String>,
    pub train_line_name: Option<String>,
    /// Walking time in minutes
    pub walk: Option<String>,
}

/// Fixed-shape output for one listing page.
///
/// Every schema key is always present. Station and image groups are fixed-size
/// arrays, so slots past what the page had are `None` and still serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    pub link: String,
    pub property_csv_id: Option<String>,
    pub postcode: Option<String>,

    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub chome_banchi: Option<String>,

    pub building_type: Option<BuildingType>,
    pub year: Option<String>,
    pub building_name_en: Option<String>,
    pub building_name_ja: Option<String>,

    pub map_lat: Option<String>,
    pub map_lng: Option<String>,

    pub stations: [StationSlot; MAX_STATIONS],
    pub images: [Option<String>; MAX_IMAGES],
}

impl ListingRecord {
    /// All schema fields in output order
    pub fn entries(&self) -> Vec<(String, Option<&str>)> {
        let mut out: Vec<(String, Option<&str>)> = Vec::with_capacity(80);
        let mut push = |key: &str, value| out.push((key.to_string(), value));

        push("link", Some(self.link.as_str()));
        push("property_csv_id", self.property_csv_id.as_deref());
        push("postcode", self.postcode.as_deref());
        push("prefecture", self.prefecture.as_deref());
        push("city", self.city.as_deref());
        push("district", self.district.as_deref());
        push("chome_banchi", self.chome_banchi.as_deref());
        push("building_type", self.building_type.map(|t| t.as_str()));
        push("year", self.year.as_deref());
        push("building_name_en", self.building_name_en.as_deref());
        push("building_name_ja", self.building_name_ja.as_deref());
        for key in RESERVED_NAME_FIELDS.iter().chain(RESERVED_DESCRIPTION_FIELDS) {
            push(key, None);
        }
        push("map_lat", self.map_lat.as_deref());
        push("map_lng", self.map_lng.as_deref());

        for (i, station) in self.stations.iter().enumerate() {
            let n = i + 1;
            push(&format!("station_name_{n}"), station.station_name.as_deref());
            push(&format!("train_line_name_{n}"), station.train_line_name.as_deref());
            push(&format!("walk_{n}"), station.walk.as_deref());
        }

        for (i, image) in self.images.iter().enumerate() {
            push(&format!("image_url_{}", i + 1), image.as_deref());
        }

        for key in RESERVED_TRAILING_FIELDS {
            push(key, None);
        }

        out
    }

    /// Value of one schema field. `None` covers both unknown keys and null values.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .into_iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v)
    }

    /// The fixed schema keys, in output order
    pub fn schema_keys() -> Vec<String> {
        ListingRecord::default()
            .entries()
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    pub fn station_count(&self) -> usize {
        self.stations
            .iter()
            .filter(|s| **s != StationSlot::default())
            .count()
    }

    pub fn image_count(&self) -> usize {
        self.images.iter().filter(|i| i.is_some()).count()
    }
}

impl Serialize for ListingRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
