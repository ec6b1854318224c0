//! Shared fetch/parse pipeline used by every engine.
//!
//! Only [`fetch`] suspends. Parsing runs synchronously on the fetched body,
//! so the parsed document never lives across an await point.

use std::time::Duration;

use scraper::Html;
use tracing::{debug, trace};

use crate::parser::compile;
use crate::transport::{Transport, TransportRequest};
use crate::{EngineDescriptor, ParseContext, Result, SearchError, VideoResult};

/// Runs one engine for one query: build URL, fetch, parse.
///
/// Fails only for request-level problems (timeout, transport error, non-2xx
/// status, empty body, invalid selector). Items the parser cannot read are
/// skipped.
pub async fn search(
    descriptor: &EngineDescriptor,
    transport: &dyn Transport,
    query: &str,
    page: u32,
    timeout: Duration,
) -> Result<Vec<VideoResult>> {
    let url = descriptor.build_url(query, page)?;
    debug!("Engine {} fetching {}", descriptor.name, url);
    let body = fetch(transport, &url, timeout).await?;
    parse_all(descriptor, &body)
}

/// Fetches a page, bounded by `timeout`.
pub async fn fetch(transport: &dyn Transport, url: &str, timeout: Duration) -> Result<String> {
    let request = TransportRequest::new(url, timeout);
    let response = match tokio::time::timeout(timeout, transport.execute(&request)).await {
        Ok(response) => response?,
        Err(_) => return Err(SearchError::Timeout),
    };
    let body = response.error_for_status()?.text();
    if body.trim().is_empty() {
        return Err(SearchError::Parse("empty response body".to_string()));
    }
    Ok(body)
}

/// Locates result items in `body` and maps each through the engine's parser.
pub fn parse_all(descriptor: &EngineDescriptor, body: &str) -> Result<Vec<VideoResult>> {
    let selector = compile(&descriptor.item_selector)?;
    let document = Html::parse_document(body);
    let ctx = ParseContext::new(&descriptor.base_url);
    let parser = descriptor.parser();

    let mut results = Vec::new();
    let mut skipped = 0usize;
    for item in document.select(&selector) {
        match parser.parse(item, &ctx) {
            Some(result) => {
                results.push(result.with_source(&descriptor.name, &descriptor.display_name))
            }
            None => {
                skipped += 1;
                trace!("Engine {} skipped an item without title or link", descriptor.name);
            }
        }
    }
    if skipped > 0 {
        trace!("Engine {} skipped {} item(s)", descriptor.name, skipped);
    }
    Ok(results)
}
