//! Prometheus exporter for smart plug operational state.
//!
//! Each scrape of `/metrics?target=<addr>` queries the named plug over
//! UDP and answers with that target's metric set. Collectors are created
//! lazily per target and cached for the life of the process.

mod collector;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use plugctl_core::{parse_bind_addr, Transport};

use collector::{CollectorCache, ScrapeError};

/// Prometheus exporter for smart plugs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to serve HTTP on
    #[arg(short, long, default_value = "0.0.0.0:9142", env = "PLUG_EXPORTER_LISTEN")]
    listen: SocketAddr,

    /// Local address to bind UDP sockets to (IP or IP:port)
    #[arg(long, env = "PLUG_EXPORTER_LOCAL")]
    local: Option<String>,

    /// Device reply deadline in milliseconds
    #[arg(long, default_value = "1000", env = "PLUG_EXPORTER_TIMEOUT_MS")]
    timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Application state shared across handlers.
struct AppState {
    cache: CollectorCache,
    transport: Transport,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("plugctl-exporter v{}", env!("CARGO_PKG_VERSION"));

    let local = match args.local.as_deref() {
        Some(addr) => match parse_bind_addr(addr) {
            Ok(addr) => Some(addr),
            Err(e) => {
                tracing::error!("invalid --local address: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let state = Arc::new(AppState {
        cache: CollectorCache::new(),
        transport: Transport::new()
            .with_local(local)
            .with_read_deadline(Duration::from_millis(args.timeout_ms)),
    });

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    info!("Starting server on http://{}", args.listen);
    info!(
        "Scrape endpoint: http://{}/metrics?target=<device-addr>",
        args.listen
    );

    let listener = match TcpListener::bind(args.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

/// Root handler - shows a simple HTML page.
async fn root_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Plug Exporter</title></head>
<body>
    <h1>Plug Exporter</h1>
    <p>Prometheus exporter for smart plug operational state.</p>
    <ul>
        <li><code>/metrics?target=&lt;device-addr&gt;</code> - per-device metrics</li>
        <li><a href="/health">/health</a> - health check</li>
    </ul>
</body>
</html>"#,
    )
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Scrape handler. The `target` query parameter names the device to poll.
async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(target) = params.get("target") else {
        return (StatusCode::NOT_FOUND, "target parameter is required").into_response();
    };

    match scrape(&state, target).await {
        Ok(body) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(%target, error = %e, "scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("scrape failed: {}", e),
            )
                .into_response()
        }
    }
}

async fn scrape(state: &AppState, target: &str) -> Result<String, ScrapeError> {
    let collector = state.cache.collector_for(target).await?;
    collector.update(&state.transport).await?;
    collector.encode()
}
