//! HTML parser for extracting links and their contexts
//!
//! This module handles parsing HTML content to extract:
//! - Link targets to check (from <a> tags)
//! - The textual neighborhood of each anchor: anchor text, title attribute,
//!   surrounding text, enclosing section, and the nearest preceding heading
//!
//! Every `<a href>` is a candidate; skip rules only drop targets that cannot
//! be checked over HTTP (fragments, javascript:, mailto:, tel:, data:).

use crate::state::LinkContext;
use crate::url::normalize_url;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Characters of parent text kept on each side of the anchor
const SURROUNDING_TEXT_CHARS: usize = 100;

/// A link found on a page, paired with the context it appeared in
#[derive(Debug, Clone)]
pub struct LinkEntry {
    /// Resolved, normalized target
    pub url: Url,

    /// Where and how the link appeared
    pub context: LinkContext,
}

/// Extracts all checkable link targets from a page
///
/// Relative hrefs are resolved against `base_url`; results are normalized
/// (fragment stripped). Duplicate anchors yield duplicate entries.
///
/// # Example
///
/// ```
/// use linkmend::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/docs">Docs</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/docs");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_link(href, base_url) {
                    links.push(url);
                }
            }
        }
    }

    links
}

/// Extracts links together with the context each anchor appeared in
pub fn extract_link_entries(html: &str, base_url: &Url) -> Vec<LinkEntry> {
    let document = Html::parse_document(html);
    let mut entries = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_link(href, base_url) {
                    entries.push(LinkEntry {
                        url,
                        context: extract_context(element, base_url),
                    });
                }
            }
        }
    }

    entries
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link cannot be checked:
/// - empty hrefs and bare fragments
/// - javascript:, mailto:, tel:, data: schemes
/// - anything that fails to resolve or normalize
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let resolved = base_url.join(href).ok()?;

    // Normalizing strips the fragment and rejects non-HTTP schemes
    normalize_url(resolved.as_str()).ok()
}

/// Collects the context surrounding one anchor element
fn extract_context(element: ElementRef<'_>, page_url: &Url) -> LinkContext {
    let text = collapse_whitespace(element.text());
    let title = element
        .value()
        .attr("title")
        .unwrap_or_default()
        .to_string();
    let surrounding_text = surrounding_text(element, &text);
    let (section_id, heading) = section_info(element);

    LinkContext {
        text,
        title,
        surrounding_text,
        heading,
        section_id,
        page_url: page_url.to_string(),
    }
}

/// Joins text fragments into a single whitespace-collapsed string
fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the anchor text with up to [`SURROUNDING_TEXT_CHARS`] characters
/// of its parent's text on each side
///
/// Empty when the anchor has no parent element or its text cannot be located
/// in the parent's text. Window arithmetic is done in characters, not bytes,
/// so multibyte content cannot split a code point.
fn surrounding_text(element: ElementRef<'_>, anchor_text: &str) -> String {
    let parent = match element.parent().and_then(ElementRef::wrap) {
        Some(parent) => parent,
        None => return String::new(),
    };

    let full_text = collapse_whitespace(parent.text());
    let byte_start = match full_text.find(anchor_text) {
        Some(pos) => pos,
        None => return String::new(),
    };

    let chars: Vec<char> = full_text.chars().collect();
    let char_start = full_text[..byte_start].chars().count();
    let anchor_len = anchor_text.chars().count();

    let before: String = chars[char_start.saturating_sub(SURROUNDING_TEXT_CHARS)..char_start]
        .iter()
        .collect();
    let after_start = char_start + anchor_len;
    let after_end = (after_start + SURROUNDING_TEXT_CHARS).min(chars.len());
    let after: String = chars[after_start..after_end].iter().collect();

    format!("{} {} {}", before, anchor_text, after)
        .trim()
        .to_string()
}

/// Finds the enclosing section, article, or div and its nearest heading
///
/// Returns (section id, heading text). The id falls back to the container's
/// class, and both come back empty when the anchor sits outside any
/// container. The heading is the closest h1-h6 that precedes the container
/// in document order; a heading inside the container does not count.
fn section_info(element: ElementRef<'_>) -> (String, String) {
    let mut node = element.parent();

    while let Some(current) = node {
        if let Some(container) = ElementRef::wrap(current) {
            let name = container.value().name();
            if name == "section" || name == "article" || name == "div" {
                let id = container
                    .value()
                    .attr("id")
                    .or_else(|| container.value().attr("class"))
                    .unwrap_or_default()
                    .to_string();
                return (id, nearest_heading(container));
            }
        }
        node = current.parent();
    }

    (String::new(), String::new())
}

/// Walks backwards through document order looking for a heading
fn nearest_heading(element: ElementRef<'_>) -> String {
    let mut node = *element;

    loop {
        node = match node.prev_sibling() {
            // A previous sibling's last descendant is the closest earlier node
            Some(prev) => {
                let mut current = prev;
                while let Some(last) = current.last_child() {
                    current = last;
                }
                current
            }
            None => match node.parent() {
                Some(parent) => parent,
                None => return String::new(),
            },
        };

        if let Some(candidate) = ElementRef::wrap(node) {
            if matches!(
                candidate.value().name(),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            ) {
                return collapse_whitespace(candidate.text());
            }
        }
    }
}
