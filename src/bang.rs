//! Bang shortcuts (`!ph amateur`) and query resolution.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{Result, SearchError};

/// A `!shortcode` bound to one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bang {
    /// Shortcode without the leading `!`, stored lowercase.
    pub short_code: String,
    /// Target engine name.
    pub engine_name: String,
    /// Target engine display name.
    pub display_name: String,
}

impl Bang {
    pub fn new(
        short_code: impl Into<String>,
        engine_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            short_code: short_code.into().trim_start_matches('!').to_lowercase(),
            engine_name: engine_name.into(),
            display_name: display_name.into(),
        }
    }
}

/// Listing record of a bang.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BangListing {
    /// The bang as typed, e.g. `!ph`.
    pub bang: String,
    pub engine_name: String,
    pub display_name: String,
    pub short_code: String,
}

/// A query with its bangs removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    /// Text sent to the engines.
    pub search_text: String,
    /// Whether at least one known bang was consumed.
    pub has_bang: bool,
    /// Engines named by the bangs; empty means no restriction.
    pub target_engines: HashSet<String>,
}

/// Immutable table of bangs, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct BangRegistry {
    bangs: BTreeMap<String, Bang>,
}

impl BangRegistry {
    /// Builds the table.
    ///
    /// Rejects duplicate shortcodes and bangs targeting an engine that is not
    /// in `engines`.
    pub fn new<'a>(
        bangs: impl IntoIterator<Item = Bang>,
        engines: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let engines: HashSet<&str> = engines.into_iter().collect();
        let mut table = BTreeMap::new();
        for bang in bangs {
            if bang.short_code.is_empty() {
                return Err(SearchError::Config("empty bang shortcode".to_string()));
            }
            if !engines.contains(bang.engine_name.as_str()) {
                return Err(SearchError::UnknownEngine(bang.engine_name));
            }
            if table.contains_key(&bang.short_code) {
                return Err(SearchError::Config(format!(
                    "duplicate bang !{}",
                    bang.short_code
                )));
            }
            table.insert(bang.short_code.clone(), bang);
        }
        Ok(Self { bangs: table })
    }

    /// Looks up a shortcode, with or without the leading `!`.
    pub fn get(&self, short_code: &str) -> Option<&Bang> {
        self.bangs
            .get(&short_code.trim_start_matches('!').to_lowercase())
    }

    /// Splits leading bangs off a raw query.
    ///
    /// Scanning stops at the first token that is not a known bang. An
    /// unknown `!token` is kept as part of the search text.
    pub fn resolve(&self, raw: &str) -> Result<ResolvedQuery> {
        let mut rest = raw.trim();
        if rest.is_empty() {
            return Err(SearchError::InvalidQuery("query is empty".to_string()));
        }

        let mut targets = HashSet::new();
        while let Some(token) = rest.split_whitespace().next() {
            let bang = match token.strip_prefix('!') {
                Some(code) if !code.is_empty() => self.bangs.get(&code.to_lowercase()),
                _ => None,
            };
            let Some(bang) = bang else { break };
            targets.insert(bang.engine_name.clone());
            rest = rest[token.len()..].trim_start();
        }

        if rest.is_empty() {
            return Err(SearchError::InvalidQuery(
                "query is empty after removing bangs".to_string(),
            ));
        }
        Ok(ResolvedQuery {
            search_text: rest.to_string(),
            has_bang: !targets.is_empty(),
            target_engines: targets,
        })
    }

    /// All bangs sorted by shortcode.
    pub fn list(&self) -> Vec<BangListing> {
        self.bangs.values().map(listing).collect()
    }

    /// Bangs whose shortcode starts with `prefix` (case-insensitive, a
    /// leading `!` is ignored).
    pub fn autocomplete(&self, prefix: &str) -> Vec<BangListing> {
        let prefix = prefix.trim().trim_start_matches('!').to_lowercase();
        self.bangs
            .range(prefix.clone()..)
            .take_while(|(code, _)| code.starts_with(&prefix))
            .map(|(_, bang)| listing(bang))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bangs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bangs.is_empty()
    }
}

fn listing(bang: &Bang) -> BangListing {
    BangListing {
        bang: format!("!{}", bang.short_code),
        engine_name: bang.engine_name.clone(),
        display_name: bang.display_name.clone(),
        short_code: bang.short_code.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BangRegistry {
        BangRegistry::new(
            vec![
                Bang::new("ph", "pornhub", "Pornhub"),
                Bang::new("porn", "pornhub", "Pornhub"),
                Bang::new("rt", "redtube", "RedTube"),
                Bang::new("xv", "xvideos", "XVideos"),
            ],
            ["pornhub", "redtube", "xvideos"],
        )
        .unwrap()
    }

    fn targets(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_resolve_single_bang() {
        let resolved = registry().resolve("!ph amateur").unwrap();
        assert_eq!(resolved.search_text, "amateur");
        assert!(resolved.has_bang);
        assert_eq!(resolved.target_engines, targets(&["pornhub"]));
    }

    #[test]
    fn test_resolve_multiple_bangs_union() {
        let resolved = registry().resolve("!ph !rt amateur").unwrap();
        assert_eq!(resolved.search_text, "amateur");
        assert_eq!(resolved.target_engines, targets(&["pornhub", "redtube"]));
    }

    #[test]
    fn test_resolve_aliases_collapse() {
        let resolved = registry().resolve("!ph !porn x").unwrap();
        assert_eq!(resolved.target_engines, targets(&["pornhub"]));
    }

    #[test]
    fn test_resolve_no_bang() {
        let resolved = registry().resolve("no bang here").unwrap();
        assert_eq!(resolved.search_text, "no bang here");
        assert!(!resolved.has_bang);
        assert!(resolved.target_engines.is_empty());
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let resolved = registry().resolve("!PH Amateur").unwrap();
        assert_eq!(resolved.search_text, "Amateur");
        assert_eq!(resolved.target_engines, targets(&["pornhub"]));
    }

    #[test]
    fn test_unknown_bang_stays_literal() {
        let resolved = registry().resolve("!zz amateur").unwrap();
        assert_eq!(resolved.search_text, "!zz amateur");
        assert!(!resolved.has_bang);
        assert!(resolved.target_engines.is_empty());
    }

    #[test]
    fn test_unknown_bang_stops_scan() {
        let resolved = registry().resolve("!ph !zz !rt amateur").unwrap();
        assert_eq!(resolved.search_text, "!zz !rt amateur");
        assert_eq!(resolved.target_engines, targets(&["pornhub"]));
    }

    #[test]
    fn test_bangs_only_after_leading_tokens() {
        let resolved = registry().resolve("amateur !ph").unwrap();
        assert_eq!(resolved.search_text, "amateur !ph");
        assert!(!resolved.has_bang);
    }

    #[test]
    fn test_resolve_empty_query() {
        assert!(matches!(registry().resolve("   "), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_resolve_only_bangs() {
        assert!(matches!(registry().resolve("!ph !rt"), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_bare_exclamation_is_text() {
        let resolved = registry().resolve("! wow").unwrap();
        assert_eq!(resolved.search_text, "! wow");
    }

    #[test]
    fn test_list_sorted() {
        let codes: Vec<String> = registry().list().into_iter().map(|b| b.bang).collect();
        assert_eq!(codes, vec!["!ph", "!porn", "!rt", "!xv"]);
    }

    #[test]
    fn test_autocomplete() {
        let registry = registry();
        let codes: Vec<String> = registry
            .autocomplete("!P")
            .into_iter()
            .map(|b| b.short_code)
            .collect();
        assert_eq!(codes, vec!["ph", "porn"]);
        assert_eq!(registry.autocomplete("").len(), 4);
        assert!(registry.autocomplete("zz").is_empty());
    }

    #[test]
    fn test_rejects_duplicate_shortcode() {
        let result = BangRegistry::new(
            vec![
                Bang::new("ph", "pornhub", "Pornhub"),
                Bang::new("!PH", "pornhub", "Pornhub"),
            ],
            ["pornhub"],
        );
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_engine() {
        let result = BangRegistry::new(vec![Bang::new("zz", "nowhere", "Nowhere")], ["pornhub"]);
        assert_eq!(result.unwrap_err(), SearchError::UnknownEngine("nowhere".to_string()));
    }

    #[test]
    fn test_get_accepts_prefix() {
        let registry = registry();
        assert_eq!(registry.get("!rt").unwrap().engine_name, "redtube");
        assert!(registry.get("nope").is_none());
    }
}
