use std::collections::HashMap;

use crate::markup::{text_of, Page};

/// Definition list holding the listing's label/value metadata
const SIDE_INFO_SELECTOR: &str = "dl.rent_view_side_info";

pub const LABEL_KIND: &str = "種別";
pub const LABEL_BUILT: &str = "築年月";
pub const LABEL_LOCATION: &str = "所在地";
pub const LABELS_NAME: &[&str] = &["物件名", "建物名", "マンション名"];

/// Label → value pairs scraped from the side info block.
///
/// Labels are kept exactly as they appear on the page. A missing label means the
/// page doesn't say, not that anything went wrong.
#[derive(Debug, Default, Clone)]
pub struct SideInfo {
    entries: HashMap<String, String>,
}

impl SideInfo {
    pub fn from_page(page: &Page) -> Self {
        let mut entries = HashMap::new();

        let Some(dl) = page.select_first(SIDE_INFO_SELECTOR) else {
            return Self { entries };
        };
        let Some(pairs) = crate::markup::selector("dt, dd") else {
            return Self { entries };
        };

        let mut current_label: Option<String> = None;
        for el in dl.select(&pairs) {
            match el.value().name() {
                "dt" => {
                    let label = text_of(el, "");
                    current_label = (!label.is_empty()).then_some(label);
                }
                "dd" => {
                    if let Some(label) = current_label.take() {
                        entries.insert(label, text_of(el, " "));
                    }
                }
                _ => {}
            }
        }

        Self { entries }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// First non-empty value among `labels`, in order
    pub fn first_of(&self, labels: &[&str]) -> Option<&str> {
        labels
            .iter()
            .filter_map(|label| self.get(label))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
