//! Runtime table of engine descriptors.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::engine::EngineInfo;
use crate::{EngineDescriptor, Result, SearchError};

/// The registered engines, in registration order.
///
/// Entries are `Arc` snapshots. Flag changes replace an entry with an
/// updated copy, so a request that already captured its participants keeps
/// seeing the descriptors it started with.
#[derive(Debug)]
pub struct EngineRegistry {
    engines: RwLock<Vec<Arc<EngineDescriptor>>>,
}

impl EngineRegistry {
    /// Builds the registry; engine names must be unique.
    pub fn new(engines: Vec<EngineDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for engine in &engines {
            if !seen.insert(engine.name.as_str()) {
                return Err(SearchError::Config(format!(
                    "duplicate engine name '{}'",
                    engine.name
                )));
            }
        }
        Ok(Self {
            engines: RwLock::new(engines.into_iter().map(Arc::new).collect()),
        })
    }

    /// Names of all engines in registration order.
    pub async fn names(&self) -> Vec<String> {
        self.engines
            .read()
            .await
            .iter()
            .map(|engine| engine.name.clone())
            .collect()
    }

    /// Listing of all engines in registration order.
    pub async fn list(&self) -> Vec<EngineInfo> {
        self.engines
            .read()
            .await
            .iter()
            .map(|engine| engine.info())
            .collect()
    }

    /// Snapshot of one engine.
    pub async fn get(&self, name: &str) -> Option<Arc<EngineDescriptor>> {
        self.engines
            .read()
            .await
            .iter()
            .find(|engine| engine.name == name)
            .cloned()
    }

    /// Number of engines that are both enabled and available.
    pub async fn enabled_count(&self) -> usize {
        self.engines
            .read()
            .await
            .iter()
            .filter(|engine| engine.enabled && engine.available)
            .count()
    }

    pub async fn len(&self) -> usize {
        self.engines.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.engines.read().await.is_empty()
    }

    /// Sets the `enabled` flag of an engine.
    pub async fn set_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        self.update(name, |engine| engine.enabled = enabled).await?;
        info!("Engine {} enabled={}", name, enabled);
        Ok(())
    }

    /// Sets the `available` flag of an engine.
    pub async fn set_available(&self, name: &str, available: bool) -> Result<()> {
        self.update(name, |engine| engine.available = available).await?;
        info!("Engine {} available={}", name, available);
        Ok(())
    }

    async fn update(&self, name: &str, change: impl FnOnce(&mut EngineDescriptor)) -> Result<()> {
        let mut engines = self.engines.write().await;
        let slot = engines
            .iter_mut()
            .find(|engine| engine.name == name)
            .ok_or_else(|| SearchError::UnknownEngine(name.to_string()))?;
        let mut updated = EngineDescriptor::clone(&**slot);
        change(&mut updated);
        *slot = Arc::new(updated);
        Ok(())
    }

    /// Decides the engines of one request in a single read.
    ///
    /// The set is the explicit filter (or the enabled engines when the
    /// filter is empty), narrowed to `targets` when non-empty, minus
    /// unavailable engines. Ordered by tier, then registration order.
    /// Unknown names in `explicit` match nothing.
    pub async fn participants(
        &self,
        explicit: &[String],
        targets: &HashSet<String>,
    ) -> Vec<Arc<EngineDescriptor>> {
        let engines = self.engines.read().await;
        for name in explicit {
            if !engines.iter().any(|engine| &engine.name == name) {
                warn!("Ignoring unknown engine '{}'", name);
            }
        }

        let mut selected: Vec<Arc<EngineDescriptor>> = engines
            .iter()
            .filter(|engine| {
                if explicit.is_empty() {
                    engine.enabled
                } else {
                    explicit.contains(&engine.name)
                }
            })
            .filter(|engine| targets.is_empty() || targets.contains(&engine.name))
            .filter(|engine| engine.available)
            .cloned()
            .collect();
        // Stable, so registration order is kept within a tier.
        selected.sort_by_key(|engine| engine.tier);
        selected
    }
}
