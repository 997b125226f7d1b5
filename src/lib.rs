//! Structured data from a single rental listing detail page.
//!
//! [`extract`] turns a page URL plus its raw markup into a fixed-shape
//! [`ListingRecord`]: address parts, building metadata, nearby stations, images and
//! coordinates. Fields the page doesn't provide come out as `null`.

pub mod access;
pub mod address;
pub mod building;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod geo;
pub mod images;
pub mod markup;
pub mod output;
pub mod romanize;
pub mod side_info;
pub mod types;

pub use error::FetchError;
pub use extract::{extract, ExtractOptions, Extractor};
pub use fetch::{FetchConfig, PageClient};
pub use geo::CoordinatePolicy;
pub use output::Format;
pub use romanize::{Romanizer, Transliterate};
pub use types::{BuildingType, ListingRecord, StationSlot, MAX_IMAGES, MAX_STATIONS};
