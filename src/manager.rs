//! Search orchestration.
//!
//! A request goes through `resolve → dispatch → collect → merge`. Every
//! participating engine runs in its own task and reports one
//! [`EngineOutcome`] on a per-request channel; a single consumer drains it
//! until all engines reported, the caller cancels, or the request deadline
//! passes. Engines that never reported are recorded as failed.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bang::{BangListing, BangRegistry, ResolvedQuery};
use crate::config::SearchConfig;
use crate::engine::EngineInfo;
use crate::registry::EngineRegistry;
use crate::transport::{HttpTransport, Transport};
use crate::{
    engines, pipeline, Aggregator, EngineDescriptor, EngineOutcome, Pagination, Result,
    SearchError, SearchResponse, VideoResult,
};

/// Progress of a streamed search.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    /// One engine finished (successfully or not).
    EngineCompleted {
        engine: String,
        display_name: String,
        results: Vec<VideoResult>,
        error: Option<String>,
        elapsed_ms: u64,
    },
    /// All engines are accounted for. Always the last event.
    Done {
        engines_used: Vec<String>,
        engines_failed: Vec<String>,
        search_time_ms: u64,
        pagination: Pagination,
    },
}

impl From<&EngineOutcome> for SearchEvent {
    fn from(outcome: &EngineOutcome) -> Self {
        SearchEvent::EngineCompleted {
            engine: outcome.engine.clone(),
            display_name: outcome.display_name.clone(),
            results: outcome.results.clone(),
            error: outcome.error.as_ref().map(ToString::to_string),
            elapsed_ms: outcome.elapsed_ms,
        }
    }
}

/// Fans a query out to the participating engines and merges their answers.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct Manager {
    registry: Arc<EngineRegistry>,
    bangs: Arc<BangRegistry>,
    transport: Arc<dyn Transport>,
    config: Arc<SearchConfig>,
}

impl Manager {
    /// Creates a manager from its parts. The configuration is validated.
    pub fn new(
        registry: EngineRegistry,
        bangs: BangRegistry,
        transport: Arc<dyn Transport>,
        config: SearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: Arc::new(registry),
            bangs: Arc::new(bangs),
            transport,
            config: Arc::new(config),
        })
    }

    /// Creates a manager over the shipped engines with an [`HttpTransport`].
    pub fn from_config(config: SearchConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a manager over the shipped engines with a custom transport.
    ///
    /// Engines listed in `disabled_engines` start disabled; unknown names
    /// are rejected.
    pub fn with_transport(config: SearchConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut descriptors = engines::default_engines()?;
        for name in &config.disabled_engines {
            let engine = descriptors
                .iter_mut()
                .find(|engine| &engine.name == name)
                .ok_or_else(|| SearchError::UnknownEngine(name.clone()))?;
            engine.enabled = false;
        }
        let registry = EngineRegistry::new(descriptors)?;
        Self::new(registry, engines::default_bangs()?, transport, config)
    }

    /// Runs a search and returns the merged, paginated response.
    ///
    /// Only [`SearchError::InvalidQuery`] and [`SearchError::NoEngines`] are
    /// returned as errors; engine failures end up in `engines_failed`.
    pub async fn search(
        &self,
        cancel: &CancellationToken,
        raw_query: &str,
        page: u32,
        explicit_engines: &[String],
    ) -> Result<SearchResponse> {
        let started = Instant::now();
        let (query, participants) = self.prepare(raw_query, explicit_engines).await?;
        let outcomes = self
            .collect(cancel, &participants, &query.search_text, page, started, None)
            .await;
        Ok(self.finish(outcomes, page, started))
    }

    /// Runs a search and streams one event per engine followed by
    /// [`SearchEvent::Done`].
    ///
    /// Query and engine selection errors are returned before anything is
    /// dispatched.
    pub async fn search_stream(
        &self,
        cancel: &CancellationToken,
        raw_query: &str,
        page: u32,
        explicit_engines: &[String],
    ) -> Result<mpsc::Receiver<SearchEvent>> {
        let started = Instant::now();
        let (query, participants) = self.prepare(raw_query, explicit_engines).await?;
        let (events_tx, events_rx) = mpsc::channel(participants.len() + 1);

        let manager = self.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let collecting = manager.collect(
                &cancel,
                &participants,
                &query.search_text,
                page,
                started,
                Some(&events_tx),
            );
            let outcomes = tokio::select! {
                outcomes = collecting => outcomes,
                _ = events_tx.closed() => {
                    debug!("Event receiver dropped, abandoning search");
                    return;
                }
            };
            let response = manager.finish(outcomes, page, started);
            let done = SearchEvent::Done {
                engines_used: response.engines_used,
                engines_failed: response.engines_failed,
                search_time_ms: response.search_time_ms,
                pagination: response.pagination,
            };
            // The receiver may already be gone.
            let _ = events_tx.send(done).await;
        });
        Ok(events_rx)
    }

    async fn prepare(
        &self,
        raw_query: &str,
        explicit_engines: &[String],
    ) -> Result<(ResolvedQuery, Vec<Arc<EngineDescriptor>>)> {
        let query = self.bangs.resolve(raw_query)?;
        let participants = self
            .registry
            .participants(explicit_engines, &query.target_engines)
            .await;
        if participants.is_empty() {
            return Err(SearchError::NoEngines);
        }
        debug!(
            "Searching '{}' on {} engines (bang: {})",
            query.search_text,
            participants.len(),
            query.has_bang
        );
        Ok((query, participants))
    }

    async fn collect(
        &self,
        cancel: &CancellationToken,
        participants: &[Arc<EngineDescriptor>],
        query: &str,
        page: u32,
        started: Instant,
        events: Option<&mpsc::Sender<SearchEvent>>,
    ) -> Vec<EngineOutcome> {
        let token = cancel.child_token();
        // Engine tasks stop once collection ends or this future is dropped.
        let stop_engines = token.clone().drop_guard();
        let (tx, mut rx) = mpsc::channel::<(usize, EngineOutcome)>(participants.len());

        for (index, descriptor) in participants.iter().enumerate() {
            let descriptor = Arc::clone(descriptor);
            let transport = Arc::clone(&self.transport);
            let query = query.to_string();
            let token = token.clone();
            let tx = tx.clone();
            let timeout = self.config.engine_timeout();

            tokio::spawn(async move {
                let engine_started = Instant::now();
                let result = tokio::select! {
                    _ = token.cancelled() => Err(SearchError::Cancelled),
                    result = pipeline::search(&descriptor, transport.as_ref(), &query, page, timeout) => result,
                };
                let outcome = outcome_for(&descriptor, result, engine_started);
                let _ = tx.send((index, outcome)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<EngineOutcome>> = vec![None; participants.len()];
        let deadline = tokio::time::sleep(
            self.config
                .request_timeout()
                .saturating_sub(started.elapsed()),
        );
        tokio::pin!(deadline);

        let mut missing_reason = SearchError::Timeout;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Search cancelled by caller");
                    missing_reason = SearchError::Cancelled;
                    break;
                }
                _ = &mut deadline => {
                    warn!("Request deadline reached before all engines answered");
                    break;
                }
                received = rx.recv() => match received {
                    Some((index, outcome)) => {
                        record(&mut slots, index, outcome, events).await;
                    }
                    None => break,
                },
            }
        }
        // Outcomes that landed before the loop stopped still count.
        while let Ok((index, outcome)) = rx.try_recv() {
            record(&mut slots, index, outcome, events).await;
        }
        drop(stop_engines);

        let mut outcomes = Vec::with_capacity(slots.len());
        for (slot, descriptor) in slots.into_iter().zip(participants) {
            let outcome = match slot {
                Some(outcome) => outcome,
                None => {
                    let outcome = outcome_for(descriptor, Err(missing_reason.clone()), started);
                    log_outcome(&outcome);
                    if let Some(events) = events {
                        let _ = events.send(SearchEvent::from(&outcome)).await;
                    }
                    outcome
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    fn finish(&self, outcomes: Vec<EngineOutcome>, page: u32, started: Instant) -> SearchResponse {
        let merged = Aggregator::new()
            .with_dedup(self.config.dedup)
            .merge(outcomes);
        let (results, pagination) =
            Aggregator::paginate(merged.results, page as usize, self.config.page_size);
        let search_time_ms = started.elapsed().as_millis() as u64;

        info!(
            "Search finished in {}ms: {} results, {} engines used, {} failed",
            search_time_ms,
            pagination.total,
            merged.engines_used.len(),
            merged.engines_failed.len()
        );
        SearchResponse {
            results,
            engines_used: merged.engines_used,
            engines_failed: merged.engines_failed,
            search_time_ms,
            pagination,
        }
    }

    /// All bangs sorted by shortcode.
    pub fn list_bangs(&self) -> Vec<BangListing> {
        self.bangs.list()
    }

    /// Bangs starting with `prefix`.
    pub fn autocomplete(&self, prefix: &str) -> Vec<BangListing> {
        self.bangs.autocomplete(prefix)
    }

    /// All engines in registration order.
    pub async fn list_engines(&self) -> Vec<EngineInfo> {
        self.registry.list().await
    }

    /// Number of enabled and available engines.
    pub async fn enabled_count(&self) -> usize {
        self.registry.enabled_count().await
    }

    pub async fn set_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        self.registry.set_enabled(name, enabled).await
    }

    pub async fn set_available(&self, name: &str, available: bool) -> Result<()> {
        self.registry.set_available(name, available).await
    }
}

fn outcome_for(
    descriptor: &EngineDescriptor,
    result: Result<Vec<VideoResult>>,
    started: Instant,
) -> EngineOutcome {
    let (results, error) = match result {
        Ok(results) => (results, None),
        Err(e) => (Vec::new(), Some(e)),
    };
    EngineOutcome {
        engine: descriptor.name.clone(),
        display_name: descriptor.display_name.clone(),
        tier: descriptor.tier,
        results,
        error,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

async fn record(
    slots: &mut [Option<EngineOutcome>],
    index: usize,
    outcome: EngineOutcome,
    events: Option<&mpsc::Sender<SearchEvent>>,
) {
    log_outcome(&outcome);
    if let Some(events) = events {
        let _ = events.send(SearchEvent::from(&outcome)).await;
    }
    slots[index] = Some(outcome);
}

fn log_outcome(outcome: &EngineOutcome) {
    match &outcome.error {
        None => debug!(
            "Engine {} returned {} results in {}ms",
            outcome.engine,
            outcome.results.len(),
            outcome.elapsed_ms
        ),
        Some(e) => warn!(
            "Engine {} failed after {}ms: {}",
            outcome.engine, outcome.elapsed_ms, e
        ),
    }
}
