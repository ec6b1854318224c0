//! Layout of the `div.thumb-block` grids (XVideos, XNXX).
//!
//! These pages print duration, views and rating as one metadata line
//! ("12 min - 1.2M Views - 93%"), so the fields are picked out of that line
//! when no dedicated element exists.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::normalize::{
    element_text, extract_quality, is_premium, parse_duration, parse_rating, parse_views,
};
use crate::parser::{attr_of, compile, first_text, THUMBNAIL_ATTRS};
use crate::{ParseContext, Parser, Result, VideoResult};

const ITEM: &str = "div.thumb-block";

static META_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}:\d{2}(?::\d{2})?|\d+\s*min)").expect("static regex")
});
static META_VIEWS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)*\s*[kmb]?)\s*views").expect("static regex")
});
static META_RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?\s*%").expect("static regex"));

/// Parser for thumb-block grids.
pub struct ThumbBlockLayout {
    title_link: Selector,
    thumbnail: Selector,
    duration: Selector,
    metadata: Selector,
    uploader: Selector,
}

impl ThumbBlockLayout {
    /// Creates the layout.
    pub fn new() -> Result<Self> {
        Ok(Self {
            title_link: compile("p.title a, .thumb-under a")?,
            thumbnail: compile(".thumb img, img")?,
            duration: compile("span.duration")?,
            metadata: compile("p.metadata, .metadata")?,
            uploader: compile(".metadata .name, .uploader a")?,
        })
    }
}

impl Parser for ThumbBlockLayout {
    fn layout(&self) -> &str {
        "thumb-block"
    }

    fn item_selector(&self) -> &str {
        ITEM
    }

    fn parse(&self, item: ElementRef<'_>, ctx: &ParseContext<'_>) -> Option<VideoResult> {
        let anchor = item.select(&self.title_link).next()?;
        let mut title = attr_of(anchor, &["title"]);
        if title.is_empty() {
            title = element_text(anchor);
        }
        let url = ctx.resolve(&attr_of(anchor, &["href"]));

        let thumbnail = item
            .select(&self.thumbnail)
            .next()
            .map(|img| attr_of(img, THUMBNAIL_ATTRS))
            .unwrap_or_default();
        let metadata = first_text(item, Some(&self.metadata));

        let mut duration = first_text(item, Some(&self.duration));
        if duration.is_empty() {
            duration = META_DURATION
                .find(&metadata)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
        }
        let views = META_VIEWS
            .captures(&metadata)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();
        let rating = META_RATING
            .find(&metadata)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let premium = is_premium(&url, &item.html());

        let result = VideoResult::new(title, url)?
            .with_id(attr_of(item, &["data-id"]))
            .with_thumbnail(ctx.resolve(&thumbnail))
            .with_preview(ctx.resolve(&attr_of_first(item, &self.thumbnail, "data-pvv")))
            .with_duration(parse_duration(&duration))
            .with_views(parse_views(&views))
            .with_rating(parse_rating(&rating))
            .with_quality(extract_quality(item))
            .with_uploader(first_text(item, Some(&self.uploader)))
            .with_premium(premium);
        Some(result)
    }
}

fn attr_of_first(item: ElementRef<'_>, selector: &Selector, attr: &str) -> String {
    item.select(selector)
        .next()
        .map(|el| attr_of(el, &[attr]))
        .unwrap_or_default()
}
