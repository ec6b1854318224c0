//! Normalization of the loosely formatted text scraped from result pages.
//!
//! Every source prints durations, view counts and ratings differently. The
//! functions here turn that text into canonical values and are shared by all
//! parsers so that no layout re-implements them.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

/// Keywords that mark a result as paid or members-only content.
pub const PREMIUM_KEYWORDS: &[&str] = &["premium", "gold", "vip", "paid", "exclusive", "members-only"];

/// Selectors probed, in order, for a quality badge.
pub const QUALITY_SELECTORS: &[&str] = &[
    ".video-quality",
    ".quality",
    ".hd-badge",
    ".badge-hd",
    ".video-hd-mark",
    ".hd-mark",
    ".resolution",
    "span.hd",
];

static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s*min").expect("static regex"));
static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("static regex"));
static FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)").expect("static regex")
});
static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("static regex"));

static QUALITY_PROBES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    QUALITY_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .collect()
});
static CLASSED: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("[class]").ok());

/// Parses a duration into its display form and a number of seconds.
///
/// Accepts `mm:ss`, `hh:mm:ss` and `N min` / `Nmin`. Anything else keeps its
/// display text and yields zero seconds.
pub fn parse_duration(text: &str) -> (String, u32) {
    let display = clean_text(text);
    if display.is_empty() {
        return (display, 0);
    }

    if display.contains(':') {
        let parts: Option<Vec<u32>> = display
            .split(':')
            .map(|part| part.trim().parse::<u32>().ok())
            .collect();
        let seconds = match parts.as_deref() {
            Some([minutes, seconds]) => minutes.saturating_mul(60).saturating_add(*seconds),
            Some([hours, minutes, seconds]) => hours
                .saturating_mul(3600)
                .saturating_add(minutes.saturating_mul(60))
                .saturating_add(*seconds),
            _ => 0,
        };
        return (display, seconds);
    }

    let seconds = MINUTES
        .captures(&display)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|minutes| minutes.saturating_mul(60))
        .unwrap_or(0);
    (display, seconds)
}

/// Parses a view counter such as `1.2M`, `500K` or `1,234 views`.
///
/// Returns the original text and the count; an unparseable number yields
/// zero.
pub fn parse_views(text: &str) -> (String, i64) {
    let original = clean_text(text);

    let mut compact: String = original
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    for suffix in ["views", "view"] {
        if let Some(stripped) = compact.strip_suffix(suffix) {
            compact = stripped.to_string();
            break;
        }
    }

    let multiplier = match compact.chars().last() {
        Some('k') => 1e3,
        Some('m') => 1e6,
        Some('b') => 1e9,
        _ => 1.0,
    };
    if multiplier > 1.0 {
        compact.pop();
    }

    match numeric_prefix(&compact) {
        Some(value) => (original, (value * multiplier).round() as i64),
        None => (original, 0),
    }
}

/// Parses a rating into its display form and a 0–100 score.
///
/// `NN%` is taken as-is, `X/Y` is scaled to a percentage, and a bare number
/// (optionally followed by "stars") is treated as a 5-star scale up to 5, a
/// 10-point scale up to 10, and a percentage above that.
pub fn parse_rating(text: &str) -> (String, f64) {
    let display = clean_text(text);

    let score = if let Some(caps) = PERCENT.captures(&display) {
        caps[1].parse::<f64>().unwrap_or(0.0)
    } else if let Some(caps) = FRACTION.captures(&display) {
        let value = caps[1].parse::<f64>().unwrap_or(0.0);
        let scale = caps[2].parse::<f64>().unwrap_or(0.0);
        if scale > 0.0 {
            value / scale * 100.0
        } else {
            0.0
        }
    } else {
        let lower = display.to_lowercase();
        let bare = lower
            .trim_end_matches("stars")
            .trim_end_matches("star")
            .trim();
        match BARE_NUMBER.find(bare).and_then(|m| m.as_str().parse::<f64>().ok()) {
            Some(value) if value <= 5.0 => value * 20.0,
            Some(value) if value <= 10.0 => value * 10.0,
            Some(value) => value,
            None => 0.0,
        }
    };

    (display, score.clamp(0.0, 100.0))
}

/// Extracts a quality badge (`HD`, `4K`, `1080p`, ...) from a result item.
///
/// The first non-empty text among [`QUALITY_SELECTORS`] wins. Without badge
/// text a class name containing `4k` or `hd` is turned into `4K` / `HD`.
pub fn extract_quality(item: ElementRef<'_>) -> String {
    for probe in QUALITY_PROBES.iter() {
        if let Some(text) = item
            .select(probe)
            .map(|el| element_text(el))
            .find(|text| !text.is_empty())
        {
            return text;
        }
    }

    let classes: Vec<String> = std::iter::once(item)
        .chain(CLASSED.iter().flat_map(|sel| item.select(sel)))
        .flat_map(|el| el.value().classes().map(str::to_lowercase).collect::<Vec<_>>())
        .collect();

    if classes.iter().any(|class| class.contains("4k")) {
        "4K".to_string()
    } else if classes.iter().any(|class| class.contains("hd")) {
        "HD".to_string()
    } else {
        String::new()
    }
}

/// Resolves a possibly relative link against the source's base URL.
pub fn absolute_url(base: &str, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{rest}");
    }
    if href.starts_with('/') {
        return format!("{}{}", origin(base), href);
    }
    format!("{}/{}", base.trim_end_matches('/'), href)
}

/// Heuristic premium detection on the result URL and the item's markup.
pub fn is_premium(url: &str, markup: &str) -> bool {
    let url = url.to_lowercase();
    let markup = markup.to_lowercase();
    PREMIUM_KEYWORDS
        .iter()
        .any(|keyword| url.contains(keyword) || markup.contains(keyword))
}

/// Collapses runs of whitespace and trims.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collected, whitespace-normalized text of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

fn numeric_prefix(text: &str) -> Option<f64> {
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    text[..end].parse::<f64>().ok()
}

fn origin(base: &str) -> String {
    url::Url::parse(base)
        .ok()
        .filter(|url| url.has_host())
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_else(|| base.trim_end_matches('/').to_string())
}
