//! A-Share Data Gateway
//!
//! An HTTP gateway exposing Chinese A-share market data (quotes, financial
//! statements, index constituents, macroeconomic indicators) as remotely
//! invokable tools behind a JSON-RPC protocol.
//!
//! # Architecture
//!
//! The gateway follows clean/onion architecture with clear separation of
//! concerns:
//! - **Domain**: tabular result-set entities and the data-source trait
//! - **Formatting**: Markdown rendering with row/column truncation
//! - **Application**: the tool catalogue and argument validation
//! - **Infrastructure**: the HTTP client for the quote bridge
//! - **Mcp / Api**: JSON-RPC dispatch, routing and middleware
//!
//! # Configuration
//!
//! The gateway is configured via `config.yaml` and environment variables:
//! - `PROVIDER_URL`: quote bridge address (default: http://127.0.0.1:8765)
//! - `PORT`: listen port override
//! - `RUST_LOG`: logging level (default: info)
//! - `LOG_FORMAT`: `text` or `json`
//!
//! # Quick Start
//!
//! ```bash
//! cargo run --release
//!
//! curl http://localhost:8000/health
//! curl -X POST http://localhost:8000/mcp \
//!   -H 'Content-Type: application/json' \
//!   -d '{"jsonrpc":"2.0","id":1,"method":"tools/list"}'
//! ```

use anyhow::Context;
use ashare_gateway::api::routes::create_router;
use ashare_gateway::api::state::AppState;
use ashare_gateway::application::build_registry;
use ashare_gateway::domain::FinancialDataSource;
use ashare_gateway::infrastructure::{baostock_bridge, BaostockBridge};
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Top-level application configuration loaded from `config.yaml`.
#[derive(Deserialize, Debug, Clone, Default)]
struct Config {
    /// Server configuration (host, port, CORS origins)
    #[serde(default)]
    server: ServerConfig,
    /// Quote bridge configuration
    #[serde(default)]
    provider: ProviderConfig,
}

/// Server configuration settings.
#[derive(Deserialize, Debug, Clone)]
struct ServerConfig {
    /// Host address to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    host: String,
    /// Port number to listen on (default: 8000)
    #[serde(default = "default_port")]
    port: u16,
    /// Comma-separated list of allowed CORS origins (default: "*")
    #[serde(default = "default_allowed_origins")]
    allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Quote bridge configuration.
#[derive(Deserialize, Debug, Clone)]
struct ProviderConfig {
    /// Base URL of the baostock-style HTTP bridge
    #[serde(default = "default_provider_url")]
    base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_allowed_origins() -> String {
    "*".to_string()
}
fn default_provider_url() -> String {
    baostock_bridge::DEFAULT_BASE_URL.to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = EnvFilter::new(env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));

    if log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load config; a missing file is fine, env overrides still apply.
    let config: Config = match fs::read_to_string("config.yaml") {
        Ok(content) => serde_yaml::from_str(&content)
            .context("Failed to parse config.yaml - check YAML syntax and structure")?,
        Err(err) => {
            tracing::warn!("config.yaml not readable ({}), using defaults", err);
            Config::default()
        }
    };

    let provider_url = env::var("PROVIDER_URL").unwrap_or(config.provider.base_url);
    tracing::info!("using quote bridge at {}", provider_url);

    let data_source: Arc<dyn FinancialDataSource> = Arc::new(BaostockBridge::new(&provider_url));

    let tools = Arc::new(build_registry());
    tracing::info!("registered {} tools", tools.len());

    let metrics = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let state = AppState {
        data_source,
        tools,
        metrics,
    };

    let app = create_router(state, config.server.allowed_origins.clone());

    // Allow PORT env var override
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;
    tracing::info!("A-share data gateway running at http://{}", addr);

    // Graceful shutdown handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error during operation")?;

    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) to initiate graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
