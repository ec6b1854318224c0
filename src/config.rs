//! Search configuration with defaults, TOML loading and validation.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, SearchError};

/// Configuration of the aggregator.
///
/// Every field has a default, so a TOML file only needs the keys it wants to
/// change:
///
/// ```toml
/// engine_timeout_ms = 4000
/// page_size = 30
/// proxy = "socks5h://127.0.0.1:9050"
/// disabled_engines = ["motherless"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Deadline of a single engine, in milliseconds.
    pub engine_timeout_ms: u64,
    /// Deadline of the whole request, in milliseconds.
    pub request_timeout_ms: u64,
    /// Results per merged page.
    pub page_size: usize,
    /// Drop results whose normalized URL was already seen.
    pub dedup: bool,
    /// User agent sent to sources; a browser-like default when unset.
    pub user_agent: Option<String>,
    /// Proxy URL (`http`, `https`, `socks5`, `socks5h`).
    pub proxy: Option<String>,
    /// Engines switched off at startup.
    pub disabled_engines: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine_timeout_ms: 5_000,
            request_timeout_ms: 8_000,
            page_size: 20,
            dedup: true,
            user_agent: None,
            proxy: None,
            disabled_engines: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| SearchError::Config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the timeouts and page size.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(SearchError::Config(
                "page_size must be greater than 0".into(),
            ));
        }
        if self.engine_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err(SearchError::Config(
                "timeouts must be greater than 0".into(),
            ));
        }
        if self.engine_timeout_ms > self.request_timeout_ms {
            return Err(SearchError::Config(format!(
                "engine_timeout_ms ({}) must not exceed request_timeout_ms ({})",
                self.engine_timeout_ms, self.request_timeout_ms
            )));
        }
        Ok(())
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
