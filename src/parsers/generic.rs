//! Data-driven layout for sources whose markup is a plain thumbnail grid.

use scraper::{ElementRef, Selector};

use crate::normalize::{
    element_text, extract_quality, is_premium, parse_duration, parse_rating, parse_views,
};
use crate::parser::{attr_of, compile, compile_optional, first_attr, first_text, THUMBNAIL_ATTRS};
use crate::{ParseContext, Parser, Result, VideoResult};

/// CSS selectors describing one grid layout. Empty strings mean the source
/// does not expose that field.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutSelectors {
    /// One result item.
    pub item: &'static str,
    /// Anchor carrying the video page link.
    pub link: &'static str,
    /// Element carrying the title (as `title` attribute or text).
    pub title: &'static str,
    /// Thumbnail image.
    pub thumbnail: &'static str,
    /// Attribute on the thumbnail holding an animated preview.
    pub preview_attr: &'static str,
    /// Duration label.
    pub duration: &'static str,
    /// View counter.
    pub views: &'static str,
    /// Rating label.
    pub rating: &'static str,
    /// Uploader or channel name.
    pub uploader: &'static str,
    /// Attribute on the item holding the source's video id.
    pub id_attr: &'static str,
}

/// A [`Parser`] configured entirely by [`LayoutSelectors`].
pub struct GenericLayout {
    name: String,
    item: String,
    link: Selector,
    title: Option<Selector>,
    thumbnail: Option<Selector>,
    preview_attr: &'static str,
    duration: Option<Selector>,
    views: Option<Selector>,
    rating: Option<Selector>,
    uploader: Option<Selector>,
    id_attr: &'static str,
}

impl GenericLayout {
    /// Compiles a layout; fails if any selector is invalid.
    pub fn new(name: impl Into<String>, selectors: LayoutSelectors) -> Result<Self> {
        compile(selectors.item)?;
        Ok(Self {
            name: name.into(),
            item: selectors.item.to_string(),
            link: compile(selectors.link)?,
            title: compile_optional(selectors.title)?,
            thumbnail: compile_optional(selectors.thumbnail)?,
            preview_attr: selectors.preview_attr,
            duration: compile_optional(selectors.duration)?,
            views: compile_optional(selectors.views)?,
            rating: compile_optional(selectors.rating)?,
            uploader: compile_optional(selectors.uploader)?,
            id_attr: selectors.id_attr,
        })
    }

    fn title(&self, item: ElementRef<'_>, link: ElementRef<'_>) -> String {
        let from_title = self
            .title
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .map(|el| {
                let attr = attr_of(el, &["title", "alt"]);
                if attr.is_empty() {
                    element_text(el)
                } else {
                    attr
                }
            })
            .unwrap_or_default();
        if !from_title.is_empty() {
            return from_title;
        }
        let attr = attr_of(link, &["title", "aria-label"]);
        if attr.is_empty() {
            element_text(link)
        } else {
            attr
        }
    }
}

impl Parser for GenericLayout {
    fn layout(&self) -> &str {
        &self.name
    }

    fn item_selector(&self) -> &str {
        &self.item
    }

    fn parse(&self, item: ElementRef<'_>, ctx: &ParseContext<'_>) -> Option<VideoResult> {
        let link = item.select(&self.link).next()?;
        let url = ctx.resolve(link.value().attr("href").unwrap_or_default());
        let title = self.title(item, link);

        let thumbnail = first_attr(item, self.thumbnail.as_ref(), THUMBNAIL_ATTRS);
        let preview = if self.preview_attr.is_empty() {
            String::new()
        } else {
            first_attr(item, self.thumbnail.as_ref(), &[self.preview_attr])
        };
        let premium = is_premium(&url, &item.html());

        let mut result = VideoResult::new(title, url)?
            .with_thumbnail(ctx.resolve(&thumbnail))
            .with_preview(ctx.resolve(&preview))
            .with_duration(parse_duration(&first_text(item, self.duration.as_ref())))
            .with_views(parse_views(&first_text(item, self.views.as_ref())))
            .with_rating(parse_rating(&first_text(item, self.rating.as_ref())))
            .with_quality(extract_quality(item))
            .with_uploader(first_text(item, self.uploader.as_ref()))
            .with_premium(premium);
        if !self.id_attr.is_empty() {
            result = result.with_id(attr_of(item, &[self.id_attr]));
        }
        Some(result)
    }
}
