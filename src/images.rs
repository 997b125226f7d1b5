use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::markup::Page;

pub const DEFAULT_IMAGE_LIMIT: usize = 8;

/// Lazy-load attributes, checked before `src`
const LAZY_SOURCE_ATTRS: &[&str] = &["data-src", "data-original"];

/// Distinct absolute image URLs in document order, at most `limit`.
///
/// Inline `data:` images are skipped. Relative sources resolve against `base_url`.
pub fn extract_images(page: &Page, base_url: &str, limit: usize) -> Vec<String> {
    let base = Url::parse(base_url).ok();
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    if limit == 0 {
        return images;
    }

    for img in page.select_all("img") {
        let element = img.value();
        let source = LAZY_SOURCE_ATTRS
            .iter()
            .chain(std::iter::once(&"src"))
            .filter_map(|attr| element.attr(attr))
            .map(str::trim)
            .find(|s| !s.is_empty());

        let Some(source) = source else {
            continue;
        };
        if source.get(..5).map_or(false, |p| p.eq_ignore_ascii_case("data:")) {
            continue;
        }

        let Some(resolved) = resolve(base.as_ref(), source) else {
            debug!(source, "skipping unresolvable image source");
            continue;
        };

        if seen.insert(resolved.clone()) {
            images.push(resolved);
            if images.len() >= limit {
                break;
            }
        }
    }

    images
}

fn resolve(base: Option<&Url>, source: &str) -> Option<String> {
    let url = match base {
        Some(base) => base.join(source).ok()?,
        None => Url::parse(source).ok()?,
    };
    Some(url.to_string())
}
