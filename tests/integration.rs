//! End-to-end tests of the search manager.
//!
//! Sources are served by a scripted in-memory transport (or a local
//! `wiremock` server), so these run offline. The live test at the bottom is
//! `#[ignore]`d; run it with
//! `cargo test --test integration -- --ignored`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use tube_search::parsers::{GenericLayout, LayoutSelectors};
use tube_search::{
    pipeline, Bang, BangRegistry, EngineDescriptor, EngineRegistry, HttpTransport, Manager,
    Result, SearchConfig, SearchError, SearchEvent, Transport, TransportRequest,
    TransportResponse,
};

/// How a scripted source answers.
#[derive(Clone)]
enum Reply {
    Page { delay_ms: u64, body: String },
    Status(u16),
    Fail,
}

/// Routes requests by host to a scripted reply.
struct ScriptedTransport {
    replies: HashMap<String, Reply>,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let host = url::Url::parse(&request.url)?
            .host_str()
            .unwrap_or_default()
            .to_string();
        match self.replies.get(&host) {
            Some(Reply::Page { delay_ms, body }) => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(TransportResponse::new(200, body.clone()))
            }
            Some(Reply::Status(status)) => Ok(TransportResponse::new(*status, "blocked")),
            Some(Reply::Fail) | None => Err(SearchError::Http(format!("connection refused: {host}"))),
        }
    }
}

fn grid_layout() -> Arc<GenericLayout> {
    Arc::new(
        GenericLayout::new(
            "grid",
            LayoutSelectors {
                item: "div.video",
                link: "a.link",
                title: ".title",
                duration: ".duration",
                views: ".views",
                ..Default::default()
            },
        )
        .unwrap(),
    )
}

fn engine(name: &str, tier: u8) -> EngineDescriptor {
    EngineDescriptor::new(
        name,
        format!("{} Tube", name.to_uppercase()),
        format!("https://{name}.test"),
        tier,
        "/search?q={query}&page={page}",
        grid_layout(),
    )
}

fn page_of(name: &str, count: usize) -> String {
    let items: String = (0..count)
        .map(|i| {
            format!(
                r#"<div class="video">
                     <a class="link" href="/watch/{name}-{i}"></a>
                     <span class="title">{name} video {i}</span>
                     <span class="duration">10:{i:02}</span>
                     <span class="views">{i}K views</span>
                   </div>"#
            )
        })
        .collect();
    format!("<html><body>{items}</body></html>")
}

fn ok(name: &str, count: usize, delay_ms: u64) -> (String, Reply) {
    (
        format!("{name}.test"),
        Reply::Page {
            delay_ms,
            body: page_of(name, count),
        },
    )
}

struct Setup {
    engines: Vec<EngineDescriptor>,
    replies: Vec<(String, Reply)>,
    config: SearchConfig,
}

impl Setup {
    fn new(engines: &[(&str, u8)]) -> Self {
        Self {
            engines: engines.iter().map(|(name, tier)| engine(name, *tier)).collect(),
            replies: Vec::new(),
            config: SearchConfig::default(),
        }
    }

    fn reply(mut self, reply: (String, Reply)) -> Self {
        self.replies.push(reply);
        self
    }

    fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    fn build(self) -> Manager {
        let names: Vec<String> = self.engines.iter().map(|e| e.name.clone()).collect();
        let bangs = names
            .iter()
            .map(|name| Bang::new(name.clone(), name.clone(), name.to_uppercase()));
        let bangs = BangRegistry::new(bangs, names.iter().map(String::as_str)).unwrap();
        let registry = EngineRegistry::new(self.engines).unwrap();
        let transport = ScriptedTransport {
            replies: self.replies.into_iter().collect(),
        };
        Manager::new(registry, bangs, Arc::new(transport), self.config).unwrap()
    }
}

#[tokio::test]
async fn test_partial_failure_is_degraded_success() {
    let manager = Setup::new(&[("a", 1), ("b", 1), ("c", 1)])
        .reply(ok("a", 3, 0))
        .reply(ok("b", 3, 2_000))
        .reply(ok("c", 3, 0))
        .config(SearchConfig {
            engine_timeout_ms: 200,
            request_timeout_ms: 1_000,
            ..Default::default()
        })
        .build();

    let response = manager
        .search(&CancellationToken::new(), "anything", 1, &[])
        .await
        .unwrap();

    assert_eq!(response.engines_used, vec!["a", "c"]);
    assert_eq!(response.engines_failed, vec!["b"]);
    assert_eq!(response.results.len(), 6);
    assert!(response.results.iter().all(|r| r.source != "b"));
}

#[tokio::test]
async fn test_fan_out_is_bounded_by_engine_timeout() {
    let manager = Setup::new(&[("fast1", 1), ("fast2", 1), ("slow", 1)])
        .reply(ok("fast1", 2, 50))
        .reply(ok("fast2", 2, 50))
        .reply(ok("slow", 2, 2_000))
        .config(SearchConfig {
            engine_timeout_ms: 500,
            request_timeout_ms: 1_000,
            ..Default::default()
        })
        .build();

    let started = Instant::now();
    let response = manager
        .search(&CancellationToken::new(), "anything", 1, &[])
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(450), "returned too early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1_500), "not bounded: {elapsed:?}");
    assert_eq!(response.engines_failed, vec!["slow"]);
    assert_eq!(response.results.len(), 4);
}

#[tokio::test]
async fn test_pagination_over_merged_results() {
    let manager = Setup::new(&[("a", 1), ("b", 1), ("c", 2)])
        .reply(ok("a", 15, 0))
        .reply(ok("b", 15, 0))
        .reply(ok("c", 15, 0))
        .build();

    let response = manager
        .search(&CancellationToken::new(), "anything", 2, &[])
        .await
        .unwrap();

    assert_eq!(response.pagination.total, 45);
    assert_eq!(response.pagination.pages, 3);
    assert_eq!(response.pagination.page, 2);
    assert_eq!(response.pagination.limit, 20);
    assert_eq!(response.results.len(), 20);
    // Items 21-40: positions 10-14 of tier-1 a/b interleaved, then c.
    assert_eq!(response.results[0].url(), "https://a.test/watch/a-10");
    assert_eq!(response.results[1].url(), "https://b.test/watch/b-10");
    assert_eq!(response.results[10].url(), "https://c.test/watch/c-0");
    assert_eq!(response.results[19].url(), "https://c.test/watch/c-9");
}

#[tokio::test]
async fn test_bang_restricts_participants() {
    let manager = Setup::new(&[("a", 1), ("b", 1), ("c", 1)])
        .reply(ok("a", 2, 0))
        .reply(ok("b", 2, 0))
        .reply(ok("c", 2, 0))
        .build();

    let response = manager
        .search(&CancellationToken::new(), "!a !c anything", 1, &[])
        .await
        .unwrap();

    assert_eq!(response.engines_used, vec!["a", "c"]);
    assert!(response.results.iter().all(|r| r.source != "b"));
}

#[tokio::test]
async fn test_all_engines_failing_is_well_formed() {
    let manager = Setup::new(&[("a", 1), ("b", 2)])
        .reply(("a.test".to_string(), Reply::Status(503)))
        .reply(("b.test".to_string(), Reply::Fail))
        .build();

    let response = manager
        .search(&CancellationToken::new(), "anything", 1, &[])
        .await
        .unwrap();

    assert!(response.results.is_empty());
    assert!(response.engines_used.is_empty());
    assert_eq!(response.engines_failed, vec!["a", "b"]);
    assert_eq!(response.pagination.total, 0);
    assert_eq!(response.pagination.pages, 0);
}

#[tokio::test]
async fn test_no_engines_available() {
    let manager = Setup::new(&[("a", 1)]).reply(ok("a", 1, 0)).build();
    manager.set_available("a", false).await.unwrap();

    let err = manager
        .search(&CancellationToken::new(), "anything", 1, &[])
        .await
        .unwrap_err();
    assert_eq!(err, SearchError::NoEngines);
}

#[tokio::test]
async fn test_unknown_bang_is_searched_literally() {
    let manager = Setup::new(&[("a", 1)]).reply(ok("a", 1, 0)).build();
    let response = manager
        .search(&CancellationToken::new(), "!zz anything", 1, &[])
        .await
        .unwrap();
    assert_eq!(response.engines_used, vec!["a"]);
}

#[tokio::test]
async fn test_cancellation_returns_promptly() {
    let manager = Setup::new(&[("a", 1), ("slow", 1)])
        .reply(ok("a", 2, 0))
        .reply(ok("slow", 2, 5_000))
        .config(SearchConfig {
            engine_timeout_ms: 8_000,
            request_timeout_ms: 10_000,
            ..Default::default()
        })
        .build();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let response = manager.search(&cancel, "anything", 1, &[]).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(response.engines_used, vec!["a"]);
    assert_eq!(response.engines_failed, vec!["slow"]);
    assert_eq!(response.results.len(), 2);
}

#[tokio::test]
async fn test_stream_delivers_engine_events_then_done() {
    let manager = Setup::new(&[("a", 1), ("b", 1), ("c", 2)])
        .reply(ok("a", 2, 30))
        .reply(("b.test".to_string(), Reply::Status(404)))
        .reply(ok("c", 1, 0))
        .build();

    let mut events = manager
        .search_stream(&CancellationToken::new(), "anything", 1, &[])
        .await
        .unwrap();

    let mut seen = Vec::new();
    let mut terminal = None;
    while let Some(event) = events.recv().await {
        assert!(terminal.is_none(), "event after Done");
        match event {
            SearchEvent::EngineCompleted { engine, error, .. } => seen.push((engine, error)),
            done @ SearchEvent::Done { .. } => terminal = Some(done),
        }
    }

    assert_eq!(seen.len(), 3);
    let failed: Vec<&str> = seen
        .iter()
        .filter(|(_, error)| error.is_some())
        .map(|(engine, _)| engine.as_str())
        .collect();
    assert_eq!(failed, vec!["b"]);
    match terminal {
        Some(SearchEvent::Done {
            engines_used,
            engines_failed,
            pagination,
            ..
        }) => {
            assert_eq!(engines_used, vec!["a", "c"]);
            assert_eq!(engines_failed, vec!["b"]);
            assert_eq!(pagination.total, 3);
        }
        _ => panic!("stream ended without Done"),
    }
}

#[tokio::test]
async fn test_items_without_title_or_link_are_skipped() {
    let body = r#"<html><body>
        <div class="video"><span class="title">no link</span></div>
        <div class="video"><a class="link" href="/watch/ok"></a><span class="title">kept</span></div>
        <div class="video"></div>
    </body></html>"#;
    let manager = Setup::new(&[("a", 1)])
        .reply((
            "a.test".to_string(),
            Reply::Page {
                delay_ms: 0,
                body: body.to_string(),
            },
        ))
        .build();

    let response = manager
        .search(&CancellationToken::new(), "anything", 1, &[])
        .await
        .unwrap();

    assert_eq!(response.engines_used, vec!["a"]);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].title(), "kept");
    assert_eq!(response.results[0].source_display, "A Tube");
}

#[tokio::test]
async fn test_response_json_shape() {
    let manager = Setup::new(&[("a", 1)]).reply(ok("a", 1, 0)).build();
    let response = manager
        .search(&CancellationToken::new(), "anything", 1, &[])
        .await
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    let result = &json["results"][0];
    assert_eq!(result["duration"], 600);
    assert_eq!(result["duration_str"], "10:00");
    assert_eq!(result["views"], 0);
    assert_eq!(result["source"], "a");
    assert_eq!(result["source_display"], "A Tube");
    assert_eq!(json["engines_used"][0], "a");
    assert_eq!(json["pagination"]["pages"], 1);
}

mod http_transport {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn descriptor(base: &str) -> EngineDescriptor {
        EngineDescriptor::new(
            "mock",
            "Mock Tube",
            base,
            1,
            "/search?q={query}&page={page}",
            grid_layout(),
        )
    }

    #[tokio::test]
    async fn test_pipeline_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "two words"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_of("mock", 4)))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let results = pipeline::search(
            &descriptor(&server.uri()),
            &transport,
            "two words",
            1,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].url(), format!("{}/watch/mock-0", server.uri()));
        assert_eq!(results[3].views_count, 3_000);
    }

    #[tokio::test]
    async fn test_non_2xx_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = pipeline::search(
            &descriptor(&server.uri()),
            &transport,
            "x",
            1,
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert_eq!(err, SearchError::Status(403));
    }
}

#[tokio::test]
#[ignore]
async fn test_live_search() {
    let manager = Manager::from_config(SearchConfig::default()).unwrap();
    let response = manager
        .search(&CancellationToken::new(), "!ph !xv amateur", 1, &[])
        .await
        .unwrap();
    println!(
        "{} results from {:?} (failed: {:?}) in {}ms",
        response.pagination.total,
        response.engines_used,
        response.engines_failed,
        response.search_time_ms
    );
    for result in response.results.iter().take(5) {
        println!("  [{}] {} - {}", result.source, result.title(), result.url());
    }
}
