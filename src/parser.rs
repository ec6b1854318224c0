//! Parser capability shared by all source layouts.

use scraper::{ElementRef, Selector};

use crate::normalize::{absolute_url, element_text};
use crate::{Result, SearchError, VideoResult};

/// Per-engine information a parser needs while reading an item.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// Base URL of the source, used to resolve relative links.
    pub base_url: &'a str,
}

impl<'a> ParseContext<'a> {
    /// Creates a context for the given base URL.
    pub fn new(base_url: &'a str) -> Self {
        Self { base_url }
    }

    /// Resolves a link found on the page.
    pub fn resolve(&self, href: &str) -> String {
        absolute_url(self.base_url, href)
    }
}

/// Extracts normalized results from one HTML layout.
///
/// `parse` returns `None` to skip an item (typically when no title or link
/// could be found). Skipping is not an error and never fails the engine.
pub trait Parser: Send + Sync {
    /// Name of the layout, used as the key in the parser table.
    fn layout(&self) -> &str;

    /// CSS selector locating one result item on a page.
    fn item_selector(&self) -> &str;

    /// Extracts a result from a located item.
    fn parse(&self, item: ElementRef<'_>, ctx: &ParseContext<'_>) -> Option<VideoResult>;
}

/// Compiles a CSS selector, mapping failures to [`SearchError::Parse`].
pub fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector '{css}': {e:?}")))
}

/// Compiles an optional selector; an empty string means "not provided".
pub(crate) fn compile_optional(css: &str) -> Result<Option<Selector>> {
    if css.trim().is_empty() {
        Ok(None)
    } else {
        compile(css).map(Some)
    }
}

/// Text of the first non-empty match.
pub(crate) fn first_text(item: ElementRef<'_>, selector: Option<&Selector>) -> String {
    selector
        .and_then(|sel| {
            item.select(sel)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
        .unwrap_or_default()
}

/// First non-empty value among `attrs` on the first match of `selector`.
pub(crate) fn first_attr(item: ElementRef<'_>, selector: Option<&Selector>, attrs: &[&str]) -> String {
    selector
        .and_then(|sel| item.select(sel).next())
        .map(|el| attr_of(el, attrs))
        .unwrap_or_default()
}

/// First non-empty value among `attrs` on the element itself.
pub(crate) fn attr_of(element: ElementRef<'_>, attrs: &[&str]) -> String {
    attrs
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty() && !value.starts_with("data:"))
        .unwrap_or_default()
        .to_string()
}

/// Attributes commonly holding lazily loaded thumbnail URLs, in priority order.
pub(crate) const THUMBNAIL_ATTRS: &[&str] = &[
    "data-src",
    "data-original",
    "data-thumb_url",
    "data-mediumthumb",
    "data-lazy-src",
    "src",
];
