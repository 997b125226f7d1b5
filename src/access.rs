//! Nearby stations from the transportation entry of the listing's details

use regex::Regex;
use scraper::ElementRef;
use std::sync::OnceLock;

use crate::markup::{selector, text_of, Page};

pub const DEFAULT_STATION_LIMIT: usize = 5;

const LABEL_TRANSPORT: &str = "交通";
const ROUTE_SEPARATORS: &[char] = &['／', '/'];

fn walk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"徒歩\s*(\d+)\s*分").expect("valid walk regex"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Station {
    pub line: Option<String>,
    pub name: Option<String>,
    pub walk_minutes: Option<u32>,
}

/// Stations listed under the first `交通` term, at most `limit` of them
pub fn extract_stations(page: &Page, limit: usize) -> Vec<Station> {
    let Some(details) = transport_details(page) else {
        return Vec::new();
    };
    let Some(items) = selector("li") else {
        return Vec::new();
    };

    details
        .select(&items)
        .take(limit)
        .map(|li| parse_station(&text_of(li, " ")))
        .collect()
}

/// The `dd` right after the first `dt` reading exactly `交通`
fn transport_details(page: &Page) -> Option<ElementRef<'_>> {
    let term = page
        .select_all("dt")
        .into_iter()
        .find(|dt| text_of(*dt, "") == LABEL_TRANSPORT)?;

    // Only the immediately following element counts; a stray tag in between means no stations
    let next = term.next_siblings().find_map(ElementRef::wrap)?;
    (next.value().name() == "dd").then_some(next)
}

/// `line／station 徒歩N分` → line, station, N. Without a separator only the walk
/// time is kept.
pub fn parse_station(text: &str) -> Station {
    let walk_minutes = walk_re()
        .captures(text)
        .and_then(|caps| caps[1].parse().ok());

    let Some((line, rest)) = text.split_once(ROUTE_SEPARATORS) else {
        return Station {
            walk_minutes,
            ..Default::default()
        };
    };

    // Walk time has its own field
    let name = walk_re().replace_all(rest, "");
    Station {
        line: non_empty(line),
        name: non_empty(&name),
        walk_minutes,
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS: &str = r#"<dl>
        <dt>間取り</dt><dd><ul><li>1LDK</li></ul></dd>
        <dt>交通</dt>
        <dd><ul>
            <li>東京メトロ銀座線／表参道駅 徒歩5分</li>
            <li>JR山手線/渋谷駅 徒歩 12 分</li>
            <li>バス停 徒歩3分</li>
        </ul></dd>
        <dt>交通</dt><dd><ul><li>ignored／駅 徒歩1分</li></ul></dd>
    </dl>"#;

    #[test]
    fn parses_line_station_and_walk() {
        let stations = extract_stations(&Page::from_html(ACCESS), DEFAULT_STATION_LIMIT);
        assert_eq!(stations.len(), 3);
        assert_eq!(
            stations[0],
            Station {
                line: Some("東京メトロ銀座線".to_string()),
                name: Some("表参道駅".to_string()),
                walk_minutes: Some(5),
            }
        );
        assert_eq!(stations[1].line.as_deref(), Some("JR山手線"));
        assert_eq!(stations[1].name.as_deref(), Some("渋谷駅"));
        assert_eq!(stations[1].walk_minutes, Some(12));
    }

    #[test]
    fn item_without_separator_keeps_only_walk() {
        let stations = extract_stations(&Page::from_html(ACCESS), DEFAULT_STATION_LIMIT);
        assert_eq!(
            stations[2],
            Station {
                line: None,
                name: None,
                walk_minutes: Some(3),
            }
        );
    }

    #[test]
    fn respects_limit() {
        let stations = extract_stations(&Page::from_html(ACCESS), 2);
        assert_eq!(stations.len(), 2);
        assert!(extract_stations(&Page::from_html(ACCESS), 0).is_empty());
    }

    #[test]
    fn no_transport_term_means_no_stations() {
        let page = Page::from_html("<dl><dt>交通機関</dt><dd><ul><li>a／b</li></ul></dd></dl>");
        assert!(extract_stations(&page, DEFAULT_STATION_LIMIT).is_empty());
    }

    #[test]
    fn term_must_be_followed_by_description() {
        let page = Page::from_html("<dl><dt>交通</dt><dt>x</dt><dd><ul><li>a／b</li></ul></dd></dl>");
        assert!(extract_stations(&page, DEFAULT_STATION_LIMIT).is_empty());
    }
}
