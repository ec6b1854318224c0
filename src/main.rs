//! tube-search CLI - multi-source video search from the command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use tube_search::{
    proxy::ProxyConfig, BangListing, Manager, SearchConfig, SearchEvent, SearchResponse,
    VideoResult,
};

/// tube-search - aggregate video search across many sources
#[derive(Parser)]
#[command(name = "tube-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all enabled sources
    Search(SearchArgs),

    /// List registered sources
    Engines,

    /// List bangs, optionally only those starting with a prefix
    Bangs {
        /// Shortcode prefix, e.g. "p" or "!x"
        prefix: Option<String>,
    },
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query; leading bangs such as "!ph" restrict the sources
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Page of the merged results (1-indexed)
    #[arg(short, long, default_value = "1")]
    page: u32,

    /// Sources to use (comma-separated engine names)
    #[arg(short, long, value_delimiter = ',')]
    engines: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Proxy URL (e.g. http://127.0.0.1:8080 or socks5h://127.0.0.1:9050)
    #[arg(long)]
    proxy: Option<String>,

    /// Per-source timeout in milliseconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print each source's results as soon as it answers
    #[arg(long)]
    stream: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };

    match cli.command {
        Commands::Search(args) => run_search(config, args).await,
        Commands::Engines => list_engines(config).await,
        Commands::Bangs { prefix } => list_bangs(config, prefix.as_deref()),
    }
}

async fn list_engines(config: SearchConfig) -> Result<()> {
    let manager = Manager::from_config(config)?;
    let engines = manager.list_engines().await;

    println!("Registered sources ({} enabled):\n", manager.enabled_count().await);
    for engine in &engines {
        let state = match (engine.enabled, engine.available) {
            (_, false) => "unavailable",
            (true, true) => "enabled",
            (false, true) => "disabled",
        };
        println!(
            "  {:<12} {:<12} tier {}  {:<11} {}",
            engine.name, engine.display_name, engine.tier, state, engine.base_url
        );
    }
    println!();
    println!("Usage: tube-search search \"query\" -e pornhub,xvideos");
    Ok(())
}

fn list_bangs(config: SearchConfig, prefix: Option<&str>) -> Result<()> {
    let manager = Manager::from_config(config)?;
    let bangs: Vec<BangListing> = match prefix {
        Some(prefix) => manager.autocomplete(prefix),
        None => manager.list_bangs(),
    };
    if bangs.is_empty() {
        anyhow::bail!("No bangs match '{}'", prefix.unwrap_or_default());
    }
    for bang in bangs {
        println!("  {:<14} {}", bang.bang, bang.display_name);
    }
    Ok(())
}

async fn run_search(mut config: SearchConfig, args: SearchArgs) -> Result<()> {
    if let Some(proxy) = &args.proxy {
        // Fail early on a malformed URL.
        let parsed = ProxyConfig::parse(proxy)?;
        if matches!(args.format, OutputFormat::Text) {
            eprintln!("Using proxy: {}", parsed);
        }
        config.proxy = Some(proxy.clone());
    }
    if let Some(timeout) = args.timeout {
        config.engine_timeout_ms = timeout;
        config.request_timeout_ms = config.request_timeout_ms.max(timeout);
    }

    let manager = Manager::from_config(config)?;
    let query = args.query.join(" ");
    let engines = args.engines.unwrap_or_default();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling search...");
            on_interrupt.cancel();
        }
    });

    if args.stream {
        let mut events = manager
            .search_stream(&cancel, &query, args.page, &engines)
            .await?;
        while let Some(event) = events.recv().await {
            print_event(&event, args.format)?;
        }
        return Ok(());
    }

    let response = manager.search(&cancel, &query, args.page, &engines).await?;
    print_response(&query, &response, args.format)
}

fn print_response(query: &str, response: &SearchResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!(
                "\nResults for \"{}\" (page {}/{}, {} results in {}ms):\n",
                query,
                response.pagination.page,
                response.pagination.pages,
                response.pagination.total,
                response.search_time_ms
            );
            let offset = (response.pagination.page - 1) * response.pagination.limit;
            for (i, result) in response.results.iter().enumerate() {
                print_result(offset + i + 1, result);
            }
            println!("Sources: {}", response.engines_used.join(", "));
            if !response.engines_failed.is_empty() {
                println!("Failed:  {}", response.engines_failed.join(", "));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
        OutputFormat::Compact => {
            for result in &response.results {
                print_compact(result);
            }
        }
    }
    Ok(())
}

fn print_event(event: &SearchEvent, format: OutputFormat) -> Result<()> {
    match (format, event) {
        (OutputFormat::Json, _) => println!("{}", serde_json::to_string(event)?),
        (
            OutputFormat::Text,
            SearchEvent::EngineCompleted {
                display_name,
                results,
                error,
                elapsed_ms,
                ..
            },
        ) => {
            match error {
                Some(error) => println!("== {} failed after {}ms: {}\n", display_name, elapsed_ms, error),
                None => println!("== {} ({} results, {}ms)\n", display_name, results.len(), elapsed_ms),
            }
            for (i, result) in results.iter().enumerate() {
                print_result(i + 1, result);
            }
        }
        (OutputFormat::Compact, SearchEvent::EngineCompleted { results, .. }) => {
            for result in results {
                print_compact(result);
            }
        }
        (
            OutputFormat::Text,
            SearchEvent::Done {
                engines_used,
                engines_failed,
                search_time_ms,
                pagination,
            },
        ) => {
            println!(
                "Done in {}ms: {} results from {} sources, {} failed",
                search_time_ms,
                pagination.total,
                engines_used.len(),
                engines_failed.len()
            );
        }
        (OutputFormat::Compact, SearchEvent::Done { .. }) => {}
    }
    Ok(())
}

fn print_result(position: usize, result: &VideoResult) {
    println!("{}. {}", position, result.title());
    println!("   URL: {}", result.url());

    let mut details = vec![result.source_display.clone()];
    if !result.duration.is_empty() {
        details.push(result.duration.clone());
    }
    if result.views_count > 0 {
        details.push(format!("{} views", result.views_count));
    }
    if result.rating_score > 0.0 {
        details.push(format!("{:.0}%", result.rating_score));
    }
    if !result.quality.is_empty() {
        details.push(result.quality.clone());
    }
    if result.is_premium {
        details.push("premium".to_string());
    }
    println!("   {}", details.join(" | "));
    println!();
}

fn print_compact(result: &VideoResult) {
    println!(
        "{}\t{}\t{}\t{}",
        result.source, result.duration_seconds, result.title(), result.url()
    );
}
