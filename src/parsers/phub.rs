//! Layout shared by the Pornhub network (`li.pcVideoListItem` result lists).

use scraper::{ElementRef, Selector};

use crate::normalize::{
    element_text, extract_quality, is_premium, parse_duration, parse_rating, parse_views,
};
use crate::parser::{attr_of, compile, first_text, THUMBNAIL_ATTRS};
use crate::{ParseContext, Parser, Result, VideoResult};

const ITEM: &str = "li.pcVideoListItem, li.videoBox";

/// Parser for Pornhub-network result lists.
///
/// Titles live in the `title` attribute of the title anchor (the text is
/// truncated), the video key is on the item as `data-video-vkey`, and the
/// animated preview is the thumbnail's `data-mediabook` attribute.
pub struct PhubLayout {
    title_link: Selector,
    thumb_link: Selector,
    thumbnail: Selector,
    duration: Selector,
    views: Selector,
    rating: Selector,
    uploader: Selector,
}

impl PhubLayout {
    /// Creates the layout.
    pub fn new() -> Result<Self> {
        Ok(Self {
            title_link: compile("span.title a, .title a")?,
            thumb_link: compile("a.linkVideoThumb, a[href*=\"viewkey\"]")?,
            thumbnail: compile("img")?,
            duration: compile("var.duration, .duration")?,
            views: compile("span.views var, .views")?,
            rating: compile(".rating-container .value, .value")?,
            uploader: compile(".usernameWrap a, .videoUploaderBlock a")?,
        })
    }

    fn title_and_href(&self, item: ElementRef<'_>) -> (String, String) {
        let title_anchor = item.select(&self.title_link).next();
        let title = title_anchor
            .map(|anchor| {
                let attr = attr_of(anchor, &["title", "data-title"]);
                if attr.is_empty() {
                    element_text(anchor)
                } else {
                    attr
                }
            })
            .unwrap_or_default();

        let thumb_anchor = item.select(&self.thumb_link).next();
        let href = title_anchor
            .map(|anchor| attr_of(anchor, &["href"]))
            .filter(|href| !href.is_empty())
            .or_else(|| thumb_anchor.map(|anchor| attr_of(anchor, &["href"])))
            .unwrap_or_default();

        if title.is_empty() {
            let fallback = thumb_anchor
                .map(|anchor| attr_of(anchor, &["title", "data-title"]))
                .unwrap_or_default();
            return (fallback, href);
        }
        (title, href)
    }
}

impl Parser for PhubLayout {
    fn layout(&self) -> &str {
        "phub"
    }

    fn item_selector(&self) -> &str {
        ITEM
    }

    fn parse(&self, item: ElementRef<'_>, ctx: &ParseContext<'_>) -> Option<VideoResult> {
        let (title, href) = self.title_and_href(item);
        let url = ctx.resolve(&href);

        let (thumbnail, preview) = item
            .select(&self.thumbnail)
            .next()
            .map(|img| (attr_of(img, THUMBNAIL_ATTRS), attr_of(img, &["data-mediabook"])))
            .unwrap_or_default();
        let premium = is_premium(&url, &item.html());

        let result = VideoResult::new(title, url)?
            .with_id(attr_of(item, &["data-video-vkey", "data-id"]))
            .with_thumbnail(ctx.resolve(&thumbnail))
            .with_preview(ctx.resolve(&preview))
            .with_duration(parse_duration(&first_text(item, Some(&self.duration))))
            .with_views(parse_views(&first_text(item, Some(&self.views))))
            .with_rating(parse_rating(&first_text(item, Some(&self.rating))))
            .with_quality(extract_quality(item))
            .with_uploader(first_text(item, Some(&self.uploader)))
            .with_premium(premium);
        Some(result)
    }
}
