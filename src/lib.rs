//! # tube-search
//!
//! A multi-source video search aggregator.
//!
//! A query is resolved against a bang table (`!ph amateur`), fanned out to
//! every participating source concurrently, and the per-source answers are
//! merged into one ranked, de-duplicated, paginated response. A source that
//! fails or times out only shows up in `engines_failed`.
//!
//! Sources are plain data ([`EngineDescriptor`]) bound to a [`Parser`] for
//! their HTML layout; all of them share one fetch/parse [`pipeline`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use tube_search::{Manager, SearchConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let manager = Manager::from_config(SearchConfig::default())?;
//!     let cancel = CancellationToken::new();
//!
//!     let response = manager.search(&cancel, "!ph !rt amateur", 1, &[]).await?;
//!     for result in &response.results {
//!         println!("[{}] {} {}", result.source_display, result.title(), result.url());
//!     }
//!     Ok(())
//! }
//! ```

mod aggregator;
mod bang;
mod config;
mod engine;
mod error;
mod manager;
mod parser;
mod registry;
mod result;

pub mod engines;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod proxy;
pub mod transport;

pub use aggregator::{Aggregator, Merged};
pub use bang::{Bang, BangListing, BangRegistry, ResolvedQuery};
pub use config::SearchConfig;
pub use engine::{EngineDescriptor, EngineInfo, Feature};
pub use error::{Result, SearchError};
pub use manager::{Manager, SearchEvent};
pub use parser::{compile, ParseContext, Parser};
pub use registry::EngineRegistry;
pub use result::{EngineOutcome, Pagination, SearchResponse, VideoResult};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
