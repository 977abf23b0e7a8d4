//! Dossier API server binary.
//!
//! Usage:
//!   dossier-api --config config.toml
//!   dossier-api --port 8080
//!   dossier-api --redis redis://localhost:6379/0
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` - OpenAI API key (reply and/or extraction oracle)
//! - `ANTHROPIC_API_KEY` - Anthropic API key (reply and/or extraction oracle)

use dossier_api::{serve, AppState};
use dossier_chat::{ChatService, ServiceConfig};
use dossier_graph::{GraphWriter, MemoryGraphStore};
use dossier_llm::build_llm_client;
use dossier_memory::{InMemoryRecencyStore, RecencyBuffer, RecencyStore, RedisRecencyStore};
use dossier_report::ReportService;
use dossier_worker::{spawn_pool, ExtractionPipeline, ObservationExtractor};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dossier_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments (simple for now)
    let args: Vec<String> = std::env::args().collect();
    let mut port: Option<u16> = None;
    let mut bind: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut redis_url: Option<String> = None;
    let mut workers: Option<usize> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = Some(args[i + 1].parse().expect("Invalid port number"));
                    i += 1;
                }
            }
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    bind = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--redis" | "-r" => {
                if i + 1 < args.len() {
                    redis_url = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--workers" | "-w" => {
                if i + 1 < args.len() {
                    workers = Some(args[i + 1].parse().expect("Invalid worker count"));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Dossier API Server");
                println!();
                println!("Usage: dossier-api [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --port <PORT>      Port to listen on (default: 8080)");
                println!("  -b, --bind <ADDR>      Bind address (default: 127.0.0.1)");
                println!("  -c, --config <FILE>    Path to config.toml file");
                println!("  -r, --redis <URL>      Redis URL for the recency store");
                println!("  -w, --workers <N>      Extraction worker count (default: 4)");
                println!("  -h, --help             Show this help message");
                println!();
                println!("Environment variables:");
                println!("  OPENAI_API_KEY         OpenAI API key");
                println!("  ANTHROPIC_API_KEY      Anthropic API key");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    // Load configuration, then let flags override it
    let mut config = if let Some(path) = config_path {
        tracing::info!(path = %path, "Loading configuration");
        ServiceConfig::from_file(&path)?
    } else {
        tracing::info!("Using default configuration");
        ServiceConfig::default()
    };
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(url) = redis_url {
        config.recency.redis_url = Some(url);
    }
    if let Some(workers) = workers {
        config.dispatch.workers = workers;
    }

    // Recency store: Redis when configured, in-process otherwise
    let store: Arc<dyn RecencyStore> = match config.recency.redis_url {
        Some(ref url) => Arc::new(RedisRecencyStore::connect(url).await?),
        None => {
            tracing::warn!(
                "No redis_url configured, using the in-process recency store. \
                 Sessions will not survive a restart."
            );
            Arc::new(InMemoryRecencyStore::new())
        }
    };
    let buffer = RecencyBuffer::with_limits(
        store,
        config.recency.max_turns,
        Duration::from_secs(config.recency.ttl_secs),
    );

    // Oracles
    let reply_client = build_llm_client(&config.reply)?;
    let extraction_client = build_llm_client(&config.extraction)?;

    // Cold path: graph, pipeline, worker pool
    let graph = Arc::new(MemoryGraphStore::new());
    let pipeline = ExtractionPipeline::new(
        ObservationExtractor::new(extraction_client),
        GraphWriter::new(graph.clone()),
    );
    let (dispatcher, _pool) = spawn_pool(config.dispatch.clone(), Arc::new(pipeline));

    let chat = ChatService::new(buffer, dispatcher, reply_client)
        .with_system_prompt(config.system_prompt.clone())
        .with_reply_params(config.reply.temperature, config.reply.max_tokens);
    let reports = ReportService::new(graph);

    let state = Arc::new(AppState::new(chat, reports));
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    serve(state, addr).await?;

    Ok(())
}
