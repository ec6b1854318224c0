//! Merging of engine outcomes into one ranked list.

use std::collections::HashSet;

use crate::{EngineOutcome, Pagination, VideoResult};

/// Outcomes merged into ranked order.
#[derive(Debug, Clone, Default)]
pub struct Merged {
    /// Ranked results, de-duplicated when enabled.
    pub results: Vec<VideoResult>,
    /// Engines that answered without error, in dispatch order.
    pub engines_used: Vec<String>,
    /// Engines that failed, in dispatch order.
    pub engines_failed: Vec<String>,
}

/// Ranks results from multiple engines.
///
/// Results are ordered by engine tier, then by their position within the
/// engine's own list, then by dispatch order, so engines of one tier are
/// interleaved rather than concatenated.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    dedup: bool,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self { dedup: true }
    }
}

impl Aggregator {
    /// Creates an aggregator with de-duplication on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns normalized-URL de-duplication on or off.
    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }

    /// Merges outcomes given in dispatch order.
    pub fn merge(&self, outcomes: Vec<EngineOutcome>) -> Merged {
        let mut merged = Merged::default();
        let mut ranked: Vec<(u8, usize, usize, VideoResult)> = Vec::new();

        for (index, outcome) in outcomes.into_iter().enumerate() {
            if !outcome.is_success() {
                merged.engines_failed.push(outcome.engine);
                continue;
            }
            let tier = outcome.tier;
            ranked.extend(
                outcome
                    .results
                    .into_iter()
                    .enumerate()
                    .map(|(position, result)| (tier, position, index, result)),
            );
            merged.engines_used.push(outcome.engine);
        }

        ranked.sort_by_key(|(tier, position, index, _)| (*tier, *position, *index));

        let mut seen = HashSet::new();
        merged.results = ranked
            .into_iter()
            .map(|(_, _, _, result)| result)
            .filter(|result| !self.dedup || seen.insert(result.normalized_url()))
            .collect();
        merged
    }

    /// Cuts the requested page out of a merged list.
    pub fn paginate(
        results: Vec<VideoResult>,
        page: usize,
        limit: usize,
    ) -> (Vec<VideoResult>, Pagination) {
        let pagination = Pagination::new(page, limit, results.len());
        let range = pagination.range();
        let window = results
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .collect();
        (window, pagination)
    }
}
