//! The fixed registration list of sources and their bangs.

use crate::bang::{Bang, BangRegistry};
use crate::engine::Feature::{self, *};
use crate::parsers::{ParserTable, PhubLayout, ThumbBlockLayout};
use crate::registry::EngineRegistry;
use crate::{EngineDescriptor, Result};

use super::layouts::generic_layouts;

struct Registration {
    name: &'static str,
    display_name: &'static str,
    base_url: &'static str,
    tier: u8,
    url_template: &'static str,
    layout: &'static str,
    features: &'static [Feature],
    bangs: &'static [&'static str],
}

const FULL: &[Feature] = &[
    Pagination, Thumbnails, Previews, Duration, Views, Rating, Quality, Uploader,
];
const NO_RATING: &[Feature] = &[Pagination, Thumbnails, Previews, Duration, Views, Quality, Uploader];
const BASIC: &[Feature] = &[Pagination, Thumbnails, Duration];

const REGISTRATIONS: &[Registration] = &[
    Registration {
        name: "pornhub",
        display_name: "Pornhub",
        base_url: "https://www.pornhub.com",
        tier: 1,
        url_template: "/video/search?search={query}&page={page}",
        layout: "phub",
        features: FULL,
        bangs: &["ph", "porn", "pornhub"],
    },
    Registration {
        name: "xvideos",
        display_name: "XVideos",
        base_url: "https://www.xvideos.com",
        tier: 1,
        url_template: "/?k={query}&p={page0}",
        layout: "thumb-block",
        features: FULL,
        bangs: &["xv", "xvideos"],
    },
    Registration {
        name: "redtube",
        display_name: "RedTube",
        base_url: "https://www.redtube.com",
        tier: 1,
        url_template: "/?search={query}&page={page}",
        layout: "redtube",
        features: FULL,
        bangs: &["rt", "redtube"],
    },
    Registration {
        name: "xhamster",
        display_name: "xHamster",
        base_url: "https://xhamster.com",
        tier: 1,
        url_template: "/search/{query}?page={page}",
        layout: "xhamster",
        features: NO_RATING,
        bangs: &["xh", "xhamster"],
    },
    Registration {
        name: "xnxx",
        display_name: "XNXX",
        base_url: "https://www.xnxx.com",
        tier: 2,
        url_template: "/search/{query}/{page0}",
        layout: "thumb-block",
        features: FULL,
        bangs: &["xn", "xnxx"],
    },
    Registration {
        name: "youporn",
        display_name: "YouPorn",
        base_url: "https://www.youporn.com",
        tier: 2,
        url_template: "/search/?query={query}&page={page}",
        layout: "phub",
        features: FULL,
        bangs: &["yp", "youporn"],
    },
    Registration {
        name: "spankbang",
        display_name: "SpankBang",
        base_url: "https://spankbang.com",
        tier: 2,
        url_template: "/s/{query}/{page}/",
        layout: "spankbang",
        features: FULL,
        bangs: &["sb", "spankbang"],
    },
    Registration {
        name: "eporner",
        display_name: "Eporner",
        base_url: "https://www.eporner.com",
        tier: 2,
        url_template: "/search/{query}/{page}/",
        layout: "eporner",
        features: FULL,
        bangs: &["ep", "eporner"],
    },
    Registration {
        name: "tube8",
        display_name: "Tube8",
        base_url: "https://www.tube8.com",
        tier: 3,
        url_template: "/searches.html?q={query}&page={page}",
        layout: "phub",
        features: FULL,
        bangs: &["t8", "tube8"],
    },
    Registration {
        name: "tnaflix",
        display_name: "TNAFlix",
        base_url: "https://www.tnaflix.com",
        tier: 3,
        url_template: "/search?what={query}&page={page}",
        layout: "tnaflix",
        features: FULL,
        bangs: &["tf", "tnaflix"],
    },
    Registration {
        name: "motherless",
        display_name: "Motherless",
        base_url: "https://motherless.com",
        tier: 3,
        url_template: "/term/videos/{query}?page={page}",
        layout: "motherless",
        features: NO_RATING,
        bangs: &["mo", "motherless"],
    },
    Registration {
        name: "hqporner",
        display_name: "HQPorner",
        base_url: "https://hqporner.com",
        tier: 3,
        url_template: "/?q={query}&p={page}",
        layout: "hqporner",
        features: BASIC,
        bangs: &["hq", "hqporner"],
    },
];

/// Parser table holding every shipped layout.
pub fn default_parsers() -> Result<ParserTable> {
    let mut table = ParserTable::new();
    table.insert(PhubLayout::new()?);
    table.insert(ThumbBlockLayout::new()?);
    for layout in generic_layouts()? {
        table.insert(layout);
    }
    Ok(table)
}

/// Descriptors of every shipped source, in registration order.
pub fn default_engines() -> Result<Vec<EngineDescriptor>> {
    let parsers = default_parsers()?;
    REGISTRATIONS
        .iter()
        .map(|reg| {
            let parser = parsers.get(reg.layout)?;
            Ok(EngineDescriptor::new(
                reg.name,
                reg.display_name,
                reg.base_url,
                reg.tier,
                reg.url_template,
                parser,
            )
            .with_features(reg.features))
        })
        .collect()
}

/// Registry of every shipped source.
pub fn default_registry() -> Result<EngineRegistry> {
    EngineRegistry::new(default_engines()?)
}

/// Bang table of every shipped source.
pub fn default_bangs() -> Result<BangRegistry> {
    let bangs = REGISTRATIONS.iter().flat_map(|reg| {
        reg.bangs
            .iter()
            .map(move |code| Bang::new(*code, reg.name, reg.display_name))
    });
    BangRegistry::new(bangs, REGISTRATIONS.iter().map(|reg| reg.name))
}
