//! Parsed page wrapper with selector lookups and visible-text extraction.
//!
//! Every extractor goes through [`Page::first_text`]: try a list of selectors in
//! priority order and take the first one whose element yields non-empty text.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Elements whose text content never counts as visible page text
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct Page {
    document: Html,
}

impl Page {
    /// Parse raw page bytes. Invalid UTF-8 sequences are replaced, never rejected.
    pub fn parse(bytes: &[u8]) -> Self {
        let source = String::from_utf8_lossy(bytes);
        Self {
            document: Html::parse_document(&source),
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self::parse(html.as_bytes())
    }

    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = selector(css)?;
        self.document.select(&selector).next()
    }

    pub fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(selector) => self.document.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// Text of the first selector that matches and yields non-empty text
    pub fn first_text(&self, selectors: &[&str]) -> Option<String> {
        selectors.iter().find_map(|css| {
            let element = self.select_first(css)?;
            let text = text_of(element, " ");
            (!text.is_empty()).then_some(text)
        })
    }

    /// Visible text of the whole document, one text node per `separator`
    pub fn text(&self, separator: &str) -> String {
        text_of(self.document.root_element(), separator)
    }

    pub fn title(&self) -> Option<String> {
        let title = text_of(self.select_first("title")?, "");
        (!title.is_empty()).then_some(title)
    }
}

/// Parse a CSS selector, logging and skipping invalid ones
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = css, error = %e, "invalid selector");
            None
        }
    }
}

/// Visible text under `element`: each text node has its whitespace collapsed,
/// empty nodes are dropped and the rest are joined with `separator`.
pub fn text_of(element: ElementRef<'_>, separator: &str) -> String {
    let mut parts = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        // Text nested anywhere under a script/style counts as hidden, not just direct children
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        let cleaned = collapse_whitespace(text);
        if !cleaned.is_empty() {
            parts.push(cleaned);
        }
    }
    parts.join(separator)
}

/// Collapse runs of whitespace (including full-width spaces) to one ASCII space
pub fn collapse_whitespace(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut prev_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            // Leading whitespace is dropped outright
            if !prev_was_space && !cleaned.is_empty() {
                cleaned.push(' ');
                prev_was_space = true;
            }
        } else {
            cleaned.push(c);
            prev_was_space = false;
        }
    }
    cleaned.trim_end().to_string()
}

/// Run strategies in order and keep the first one that produces a value
pub fn first_some<T>(strategies: &[&dyn Fn() -> Option<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy())
}
