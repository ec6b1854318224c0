//! Search result types.

use serde::Serialize;

use crate::SearchError;

/// A single normalized video result.
///
/// A result always has a title and a URL: [`VideoResult::new`] refuses to
/// build one without them, which is how parsers signal a skipped item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoResult {
    /// Identifier, unique within the originating source.
    pub id: String,
    title: String,
    url: String,
    /// Thumbnail image URL.
    pub thumbnail: String,
    /// Animated preview URL, when the source exposes one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub preview_url: String,
    /// Duration as displayed by the source.
    #[serde(rename = "duration_str")]
    pub duration: String,
    /// Duration in seconds (0 when unknown).
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
    /// View counter as displayed by the source.
    #[serde(rename = "views_str")]
    pub views: String,
    /// Parsed view count (0 when unknown).
    #[serde(rename = "views")]
    pub views_count: i64,
    /// Rating as displayed by the source.
    #[serde(rename = "rating_str", skip_serializing_if = "String::is_empty")]
    pub rating: String,
    /// Rating on a 0–100 scale.
    #[serde(rename = "rating")]
    pub rating_score: f64,
    /// Quality badge (`HD`, `4K`, `1080p`, ...).
    pub quality: String,
    /// Description or tags line.
    pub description: String,
    /// Uploader or channel name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uploader: String,
    /// Heuristic paid-content marker.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_premium: bool,
    /// Engine name that produced the result.
    pub source: String,
    /// Engine display name.
    pub source_display: String,
}

impl VideoResult {
    /// Creates a result, or `None` when the title or URL is blank.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Option<Self> {
        let title = title.into().trim().to_string();
        let url = url.into().trim().to_string();
        if title.is_empty() || url.is_empty() {
            return None;
        }
        Some(Self {
            id: id_from_url(&url),
            title,
            url,
            thumbnail: String::new(),
            preview_url: String::new(),
            duration: String::new(),
            duration_seconds: 0,
            views: String::new(),
            views_count: 0,
            rating: String::new(),
            rating_score: 0.0,
            quality: String::new(),
            description: String::new(),
            uploader: String::new(),
            is_premium: false,
            source: String::new(),
            source_display: String::new(),
        })
    }

    /// Result title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Result page URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Overrides the derived identifier; blank ids are ignored.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !id.trim().is_empty() {
            self.id = id.trim().to_string();
        }
        self
    }

    /// Sets the thumbnail URL.
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    /// Sets the preview URL.
    pub fn with_preview(mut self, preview_url: impl Into<String>) -> Self {
        self.preview_url = preview_url.into();
        self
    }

    /// Sets the duration text and its parsed value in seconds.
    pub fn with_duration(mut self, (display, seconds): (String, u32)) -> Self {
        self.duration = display;
        self.duration_seconds = seconds;
        self
    }

    /// Sets the view counter text and its parsed value.
    pub fn with_views(mut self, (display, count): (String, i64)) -> Self {
        self.views = display;
        self.views_count = count;
        self
    }

    /// Sets the rating text and its 0–100 score.
    pub fn with_rating(mut self, (display, score): (String, f64)) -> Self {
        self.rating = display;
        self.rating_score = score;
        self
    }

    /// Sets the quality badge.
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the uploader.
    pub fn with_uploader(mut self, uploader: impl Into<String>) -> Self {
        self.uploader = uploader.into();
        self
    }

    /// Sets the premium marker.
    pub fn with_premium(mut self, is_premium: bool) -> Self {
        self.is_premium = is_premium;
        self
    }

    /// Tags the result with the engine that produced it.
    pub fn with_source(mut self, source: impl Into<String>, display: impl Into<String>) -> Self {
        self.source = source.into();
        self.source_display = display.into();
        self
    }

    /// Returns a normalized URL used as the de-duplication key.
    ///
    /// Scheme, `www.`, fragment and trailing slash are dropped and the host
    /// is lowercased; path and query are kept since many sources carry the
    /// video key in them.
    pub fn normalized_url(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => {
                let host = parsed.host_str().unwrap_or_default().to_lowercase();
                let host = host.trim_start_matches("www.");
                let path = parsed.path().trim_end_matches('/');
                match parsed.query() {
                    Some(query) => format!("{host}{path}?{query}"),
                    None => format!("{host}{path}"),
                }
            }
            Err(_) => self
                .url
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/')
                .to_lowercase(),
        }
    }
}

fn id_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    if segment.is_empty() || segment.contains(':') {
        url.to_string()
    } else {
        segment.to_string()
    }
}

/// The result of dispatching one engine for one request.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    /// Engine name.
    pub engine: String,
    /// Engine display name.
    pub display_name: String,
    /// Engine tier (1 = highest).
    pub tier: u8,
    /// Parsed results; empty when the engine failed.
    pub results: Vec<VideoResult>,
    /// Failure reason, if the engine failed.
    pub error: Option<SearchError>,
    /// Time spent on the engine in milliseconds.
    pub elapsed_ms: u64,
}

impl EngineOutcome {
    /// Whether the engine answered without error.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Pagination window of a [`SearchResponse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Requested page (1-indexed).
    pub page: usize,
    /// Page size.
    pub limit: usize,
    /// Number of merged results.
    pub total: usize,
    /// Number of pages.
    pub pages: usize,
}

impl Pagination {
    /// Computes the window for `total` results.
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        Self {
            page: page.max(1),
            limit,
            total,
            pages: total.div_ceil(limit),
        }
    }

    /// Index range of the window within the merged list.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page - 1).saturating_mul(self.limit).min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        start..end
    }
}

/// The aggregated answer to one search request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResponse {
    /// Results of the requested page.
    pub results: Vec<VideoResult>,
    /// Engines that answered without error.
    pub engines_used: Vec<String>,
    /// Engines that failed, timed out or were cancelled.
    pub engines_failed: Vec<String>,
    /// Wall-clock time of the request in milliseconds.
    pub search_time_ms: u64,
    /// Pagination window.
    pub pagination: Pagination,
}
