use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::markup::{first_some, Page};
use crate::side_info::{SideInfo, LABELS_NAME};
use crate::types::BuildingType;

/// Header elements tried for the building name, in order
const NAME_HEADER_SELECTORS: &[&str] = &["h1", "h2", ".rent_view_ttl"];

/// Separators between a page title and the site brand
const TITLE_SEPARATORS: &[char] = &['｜', '|', '│', '¦'];

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})年").expect("valid year regex"))
}

/// Map the native building kind onto the closed set of English codes.
/// Anything outside the known names gives `None`.
pub fn normalize_building_type(kind: Option<&str>) -> Option<BuildingType> {
    BuildingType::from_japanese(kind?.trim())
}

/// `2015` from text like `2015年3月`
pub fn extract_year_from_text(text: Option<&str>) -> Option<String> {
    let caps = year_re().captures(text?)?;
    Some(caps[1].to_string())
}

/// Native building name: side info label, then page headers, then the `<title>`
/// with the site brand cut off.
pub fn extract_building_name(page: &Page, info: &SideInfo) -> Option<String> {
    let from_side_info = || info.first_of(LABELS_NAME).map(str::to_string);
    let from_headers = || page.first_text(NAME_HEADER_SELECTORS);
    let from_title = || {
        let title = page.title()?;
        let name = title.split(TITLE_SEPARATORS).next().unwrap_or("").trim();
        debug!(title, "building name taken from document title");
        (!name.is_empty()).then(|| name.to_string())
    };

    first_some(&[&from_side_info, &from_headers, &from_title])
}
