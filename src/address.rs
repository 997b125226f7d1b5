//! Listing identifier, postal code and address extraction, plus the address
//! segmenter that splits a Japanese address into prefecture/city/remainder.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::markup::Page;

/// Address containers across the template vendors we've seen, most specific first
pub const ADDRESS_SELECTORS: &[&str] = &[
    r#"[itemprop="address"]"#,
    ".address",
    ".addr",
    ".p-address",
    ".detailAddress",
    "#address",
    ".l-property__address",
    ".c-detailAddress",
    ".p-detail__address",
];

/// Labels that start trailing contact details after an address line
const CONTACT_LABELS: &[&str] = &["TEL", "FAX", "Fax", "電話"];

fn rent_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/rent/(\d+)/(\d+)").expect("valid rent path regex"))
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid digits regex"))
}

fn postcode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{3}-\d{4})\b").expect("valid postcode regex"))
}

fn postcode_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b\d{3}-\d{4}\b[^\n]{0,200}").expect("valid address line regex")
    })
}

fn leading_postcode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d{3}-\d{4}\s*").expect("valid leading postcode regex"))
}

fn prefecture_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.+?[都道府県]").expect("valid prefecture regex"))
}

fn city_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.+?[市区郡町村]").expect("valid city regex"))
}

/// Listing identifier from the URL.
///
/// `/rent/<a>/<b>` gives `a_b`. Otherwise every digit run in the URL is joined with
/// underscores. `None` only when the URL has no digits at all.
pub fn extract_property_csv_id(url: &str) -> Option<String> {
    if let Some(caps) = rent_path_re().captures(url) {
        return Some(format!("{}_{}", &caps[1], &caps[2]));
    }

    let runs: Vec<&str> = digits_re().find_iter(url).map(|m| m.as_str()).collect();
    (!runs.is_empty()).then(|| runs.join("_"))
}

/// `NNN-NNNN` postal code from the address block, or anywhere on the page
pub fn extract_postcode(page: &Page) -> Option<String> {
    if let Some(address) = page.first_text(ADDRESS_SELECTORS) {
        if let Some(caps) = postcode_re().captures(&address) {
            return Some(caps[1].to_string());
        }
    }

    let text = page.text(" ");
    let postcode = postcode_re().captures(&text).map(|caps| caps[1].to_string());
    if postcode.is_some() {
        debug!("postcode found in page text fallback");
    }
    postcode
}

/// Literal address text from the address block.
///
/// Falls back to the first page line starting with a postal code, cut before any
/// trailing phone/fax label.
pub fn extract_address_text(page: &Page) -> Option<String> {
    if let Some(address) = page.first_text(ADDRESS_SELECTORS) {
        return Some(address);
    }

    // Newline-joined so the line capture can't run into the next block
    let text = page.text("\n");
    let line = postcode_line_re().find(&text)?.as_str();
    debug!(line, "address taken from postcode line fallback");

    let address = truncate_at_contact(line).trim();
    (!address.is_empty()).then(|| address.to_string())
}

fn truncate_at_contact(line: &str) -> &str {
    // Earliest label wins; phone and fax often share the line after the address
    let cut = CONTACT_LABELS
        .iter()
        .filter_map(|label| line.find(label))
        .min()
        .unwrap_or(line.len());
    &line[..cut]
}

/// Segmented address. `district` is never filled by [`split_japanese_address`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    /// Chome/banchi level detail left after the city
    pub remainder: Option<String>,
}

/// Split an address into prefecture, city and remainder.
///
/// Each step takes the shortest prefix ending in one of its suffix characters
/// (都道府県 for the prefecture, 市区郡町村 for the city). A step that finds no
/// suffix leaves its field empty and hands the text on untouched.
pub fn split_japanese_address(address: &str) -> AddressParts {
    let cleaned = leading_postcode_re().replace(address, "");

    let (prefecture, rest) = take_prefix(prefecture_re(), &cleaned);
    let (city, rest) = take_prefix(city_re(), rest);

    AddressParts {
        prefecture,
        city,
        district: None,
        remainder: (!rest.is_empty()).then(|| rest.to_string()),
    }
}

fn take_prefix<'a>(re: &Regex, text: &'a str) -> (Option<String>, &'a str) {
    // Only trim after a match, so an unmatched step passes its input on untouched
    match re.find(text) {
        Some(m) => (Some(m.as_str().to_string()), text[m.end()..].trim()),
        None => (None, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_id_from_rent_path() {
        assert_eq!(
            extract_property_csv_id("https://rent.tokyu-housing-lease.co.jp/rent/8034884/117024")
                .as_deref(),
            Some("8034884_117024")
        );
    }

    #[test]
    fn csv_id_falls_back_to_digit_runs() {
        assert_eq!(
            extract_property_csv_id("https://example.com/listing/99").as_deref(),
            Some("99")
        );
        assert_eq!(
            extract_property_csv_id("https://example.com/a12/b/345?page=6").as_deref(),
            Some("12_345_6")
        );
        assert_eq!(extract_property_csv_id("https://example.com/listing/"), None);
    }

    #[test]
    fn postcode_from_address_block() {
        let page = Page::from_html(
            r#"<p>本社 100-0005</p><div class="address">〒150-0001 東京都渋谷区neighborhood TEL 03-1234-5678</div>"#,
        );
        assert_eq!(extract_postcode(&page).as_deref(), Some("150-0001"));
    }

    #[test]
    fn postcode_from_page_text_when_block_has_none() {
        let page = Page::from_html(
            r#"<div class="address">東京都渋谷区</div><footer>〒107-0062 東京都港区</footer>"#,
        );
        assert_eq!(extract_postcode(&page).as_deref(), Some("107-0062"));
        assert_eq!(extract_postcode(&Page::from_html("<p>no code</p>")), None);
    }

    #[test]
    fn address_line_fallback_stops_before_phone() {
        let page = Page::from_html(
            "<body><h1>物件</h1><p>150-0001 東京都渋谷区neighborhood TEL 03-1234-5678</p></body>",
        );
        assert_eq!(
            extract_address_text(&page).as_deref(),
            Some("150-0001 東京都渋谷区neighborhood")
        );
    }

    #[test]
    fn address_line_fallback_handles_native_phone_label() {
        let page = Page::from_html("<p>160-0022 東京都新宿区新宿3-1 電話 03-0000-0000</p>");
        assert_eq!(
            extract_address_text(&page).as_deref(),
            Some("160-0022 東京都新宿区新宿3-1")
        );
    }

    #[test]
    fn address_line_fallback_skips_phone_numbers() {
        let page = Page::from_html(
            "<p>お問い合わせ 03-1234-5678</p><p>150-0001 東京都渋谷区神宮前1-2-3</p>",
        );
        assert_eq!(
            extract_address_text(&page).as_deref(),
            Some("150-0001 東京都渋谷区神宮前1-2-3")
        );
        assert_eq!(extract_postcode(&page).as_deref(), Some("150-0001"));
    }

    #[test]
    fn address_text_prefers_selector() {
        let page = Page::from_html(
            r#"<span itemprop="address">東京都目黒区中目黒1-1</span><p>150-0001 other</p>"#,
        );
        assert_eq!(
            extract_address_text(&page).as_deref(),
            Some("東京都目黒区中目黒1-1")
        );
    }

    #[test]
    fn address_text_absent_without_postcode_anchor() {
        let page = Page::from_html("<p>東京都渋谷区</p>");
        assert_eq!(extract_address_text(&page), None);
    }

    #[test]
    fn splits_prefecture_city_remainder() {
        let parts = split_japanese_address("東京都渋谷区神宮前1-2-3");
        assert_eq!(parts.prefecture.as_deref(), Some("東京都"));
        assert_eq!(parts.city.as_deref(), Some("渋谷区"));
        assert_eq!(parts.remainder.as_deref(), Some("神宮前1-2-3"));
        assert_eq!(parts.district, None);
    }

    #[test]
    fn strips_leading_postcode() {
        let parts = split_japanese_address("150-0001 東京都渋谷区 神宮前1-2-3");
        assert_eq!(parts.prefecture.as_deref(), Some("東京都"));
        assert_eq!(parts.city.as_deref(), Some("渋谷区"));
        assert_eq!(parts.remainder.as_deref(), Some("神宮前1-2-3"));
    }

    #[test]
    fn city_without_prefecture() {
        let parts = split_japanese_address("渋谷区神宮前1-2-3");
        assert_eq!(parts.prefecture, None);
        assert_eq!(parts.city.as_deref(), Some("渋谷区"));
        assert_eq!(parts.remainder.as_deref(), Some("神宮前1-2-3"));
    }

    #[test]
    fn nothing_left_after_city_is_none() {
        let parts = split_japanese_address("大阪府大阪市");
        assert_eq!(parts.prefecture.as_deref(), Some("大阪府"));
        assert_eq!(parts.city.as_deref(), Some("大阪市"));
        assert_eq!(parts.remainder, None);
    }

    #[test]
    fn unrecognised_text_goes_to_remainder() {
        let parts = split_japanese_address("1-2-3 Jingumae");
        assert_eq!(parts.prefecture, None);
        assert_eq!(parts.city, None);
        assert_eq!(parts.remainder.as_deref(), Some("1-2-3 Jingumae"));
    }
}
