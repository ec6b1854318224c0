//! Selector tables for sources handled by [`GenericLayout`].

use crate::parsers::{GenericLayout, LayoutSelectors};
use crate::Result;

pub(crate) const REDTUBE: LayoutSelectors = LayoutSelectors {
    item: "li.videoblock_list, div.video_block_wrapper",
    link: "a.video_link, a[href]",
    title: "a.video_title, .video_title",
    thumbnail: "img.js_thumbImageTag, img",
    preview_attr: "data-mediabook",
    duration: ".duration",
    views: ".video_count, .views",
    rating: ".rating_percent",
    uploader: ".video_channel, .video-property-link",
    id_attr: "data-video-id",
};

pub(crate) const XHAMSTER: LayoutSelectors = LayoutSelectors {
    item: "div.thumb-list__item",
    link: "a.video-thumb__image-container, a[href*=\"/videos/\"]",
    title: "a.video-thumb-info__name",
    thumbnail: "img.thumb-image-container__image, img",
    preview_attr: "data-previewvideo",
    duration: "[data-role=\"video-duration\"], .thumb-image-container__duration",
    views: ".video-thumb-views",
    rating: "",
    uploader: ".video-uploader__name",
    id_attr: "data-video-id",
};

pub(crate) const SPANKBANG: LayoutSelectors = LayoutSelectors {
    item: "div.video-item",
    link: "a.thumb",
    title: "a.n",
    thumbnail: "img.cover, img",
    preview_attr: "data-preview",
    duration: "span.l",
    views: "span.v",
    rating: "span.r",
    uploader: "",
    id_attr: "data-id",
};

pub(crate) const EPORNER: LayoutSelectors = LayoutSelectors {
    item: "div.mb",
    link: ".mbimg a, .mbtit a",
    title: ".mbtit a",
    thumbnail: ".mbimg img, img",
    preview_attr: "",
    duration: ".mbtim",
    views: ".mbvie",
    rating: ".mbrate",
    uploader: ".mb-uploader a",
    id_attr: "data-id",
};

pub(crate) const TNAFLIX: LayoutSelectors = LayoutSelectors {
    item: "div.video-item, li.video-item",
    link: "a.thumb, a[href*=\"/video\"]",
    title: "a.video-title, .video-title",
    thumbnail: "img",
    preview_attr: "data-trailer",
    duration: ".video-duration, .duration",
    views: ".video-views",
    rating: ".video-rating",
    uploader: ".video-uploader a",
    id_attr: "data-vid",
};

pub(crate) const MOTHERLESS: LayoutSelectors = LayoutSelectors {
    item: "div.thumb-container",
    link: "a.img-container",
    title: "a.title",
    thumbnail: "img.static, img",
    preview_attr: "data-strip-src",
    duration: ".size",
    views: ".hits",
    rating: "",
    uploader: ".uploader",
    id_attr: "data-codename",
};

pub(crate) const HQPORNER: LayoutSelectors = LayoutSelectors {
    item: "section.box.feature, div.box.page-content section",
    link: "a.image, a[href*=\"/hdporn/\"]",
    title: "h3.meta-data-title a, h3 a",
    thumbnail: "img",
    preview_attr: "",
    duration: ".fa-clock-o + span, span.icon.fa-clock-o",
    views: "",
    rating: "",
    uploader: "",
    id_attr: "",
};

/// Every generic layout under its layout name.
pub(crate) fn generic_layouts() -> Result<Vec<GenericLayout>> {
    [
        ("redtube", REDTUBE),
        ("xhamster", XHAMSTER),
        ("spankbang", SPANKBANG),
        ("eporner", EPORNER),
        ("tnaflix", TNAFLIX),
        ("motherless", MOTHERLESS),
        ("hqporner", HQPORNER),
    ]
    .into_iter()
    .map(|(name, selectors)| GenericLayout::new(name, selectors))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseContext, Parser};
    use scraper::{Html, Selector};

    #[test]
    fn test_all_generic_layouts_compile() {
        let layouts = generic_layouts().unwrap();
        assert_eq!(layouts.len(), 7);
    }

    #[test]
    fn test_spankbang_item() {
        let layout = GenericLayout::new("spankbang", SPANKBANG).unwrap();
        let html = Html::parse_document(
            r#"<div class="video-item" data-id="9xyz">
                 <a class="thumb" href="/9xyz/video/some+clip">
                   <img class="cover" data-src="https://tbi.sb-cd.com/t/9xyz.jpg" data-preview="https://tbv.sb-cd.com/9xyz.mp4">
                   <span class="l">23 min</span>
                 </a>
                 <a class="n" href="/9xyz/video/some+clip" title="Some Clip">Some Clip</a>
                 <span class="v">12K</span><span class="r">91%</span>
               </div>"#,
        );
        let selector = Selector::parse(layout.item_selector()).unwrap();
        let item = html.select(&selector).next().unwrap();
        let result = layout
            .parse(item, &ParseContext::new("https://spankbang.com"))
            .unwrap();
        assert_eq!(result.id, "9xyz");
        assert_eq!(result.title(), "Some Clip");
        assert_eq!(result.url(), "https://spankbang.com/9xyz/video/some+clip");
        assert_eq!(result.preview_url, "https://tbv.sb-cd.com/9xyz.mp4");
        assert_eq!(result.duration_seconds, 23 * 60);
        assert_eq!(result.views_count, 12_000);
        assert_eq!(result.rating_score, 91.0);
    }
}
