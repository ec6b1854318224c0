//! Engine descriptors: one data record per source.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Parser, Result, SearchError};

/// Capabilities a source exposes on its result pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Pagination,
    Thumbnails,
    Previews,
    Duration,
    Views,
    Rating,
    Quality,
    Uploader,
}

/// Static description of one source plus its bound parser.
///
/// Descriptors are created once from the registration list. Only `enabled`
/// and `available` ever change, and only through
/// [`crate::EngineRegistry`].
#[derive(Clone)]
pub struct EngineDescriptor {
    /// Unique, stable engine name (e.g. `pornhub`).
    pub name: String,
    /// Human readable name.
    pub display_name: String,
    /// Origin the URL template and relative links resolve against.
    pub base_url: String,
    /// Priority tier, 1 = highest.
    pub tier: u8,
    /// Search URL with a `{query}` placeholder and either `{page}` (1-based)
    /// or `{page0}` (0-based).
    pub url_template: String,
    /// CSS selector locating result items.
    pub item_selector: String,
    /// Supported features.
    pub features: HashSet<Feature>,
    /// Selected by default when no explicit engine filter is given.
    pub enabled: bool,
    /// Reachable at all; unavailable engines are never dispatched.
    pub available: bool,
    parser: Arc<dyn Parser>,
}

impl EngineDescriptor {
    /// Creates an enabled, available descriptor using the parser's item selector.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        base_url: impl Into<String>,
        tier: u8,
        url_template: impl Into<String>,
        parser: Arc<dyn Parser>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            base_url: base_url.into(),
            tier,
            url_template: url_template.into(),
            item_selector: parser.item_selector().to_string(),
            features: HashSet::new(),
            enabled: true,
            available: true,
            parser,
        }
    }

    /// Sets the supported features.
    pub fn with_features(mut self, features: &[Feature]) -> Self {
        self.features = features.iter().copied().collect();
        self
    }

    /// Overrides the parser's item selector for this source.
    pub fn with_item_selector(mut self, selector: impl Into<String>) -> Self {
        self.item_selector = selector.into();
        self
    }

    /// Sets whether the engine is selected by default.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The parser bound to this source.
    pub fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }

    /// Whether the source supports a feature.
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Builds the search URL for `query` and `page`.
    ///
    /// `{query}` is URL-encoded. `page` is 1-based; `{page0}` receives it
    /// minus one for sources that count from zero. Relative templates are joined to the base
    /// URL; absolute templates are used as-is.
    pub fn build_url(&self, query: &str, page: u32) -> Result<String> {
        if !self.url_template.contains("{query}") {
            return Err(SearchError::Config(format!(
                "engine '{}' URL template has no {{query}} placeholder",
                self.name
            )));
        }
        let page = page.max(1);
        let path = self
            .url_template
            .replace("{query}", &urlencoding::encode(query))
            .replace("{page0}", &(page - 1).to_string())
            .replace("{page}", &page.to_string());

        let absolute = if path.starts_with("http://") || path.starts_with("https://") {
            path
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };
        url::Url::parse(&absolute)?;
        Ok(absolute)
    }

    /// Serializable view for listing surfaces.
    pub fn info(&self) -> EngineInfo {
        let mut features: Vec<Feature> = self.features.iter().copied().collect();
        features.sort();
        EngineInfo {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            base_url: self.base_url.clone(),
            tier: self.tier,
            features,
            enabled: self.enabled,
            available: self.available,
        }
    }
}

impl fmt::Debug for EngineDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineDescriptor")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("base_url", &self.base_url)
            .field("tier", &self.tier)
            .field("url_template", &self.url_template)
            .field("item_selector", &self.item_selector)
            .field("layout", &self.parser.layout())
            .field("enabled", &self.enabled)
            .field("available", &self.available)
            .finish()
    }
}

/// Listing record of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub name: String,
    pub display_name: String,
    pub base_url: String,
    pub tier: u8,
    pub features: Vec<Feature>,
    pub enabled: bool,
    pub available: bool,
}
