//! CLI entry point - the composition root.
//!
//! This is the only place where infrastructure is wired together:
//! configuration from flags and environment, the DashScope client, and the
//! proxy server with its shutdown signal.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wanbridge_core::ProxyConfig;
use wanbridge_dashscope::{DashScopeConfig, DefaultDashScopeClient};
use wanbridge_proxy::{AppState, serve};

/// OpenAI-compatible proxy in front of DashScope text-to-image tasks.
#[derive(Debug, Parser)]
#[command(name = "wanbridge", version, about)]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Bearer credential callers must present on /v1/chat/completions.
    #[arg(long, env = "WANBRIDGE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// DashScope credential for outbound task calls.
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    dashscope_key: String,

    /// Override the DashScope API base URL.
    #[arg(long, env = "DASHSCOPE_BASE_URL")]
    dashscope_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut backend_config = DashScopeConfig::new(cli.dashscope_key);
    if let Some(base_url) = cli.dashscope_base_url {
        backend_config = backend_config.with_base_url(base_url);
    }
    let backend = Arc::new(DefaultDashScopeClient::new(&backend_config));

    let state = AppState::new(backend, ProxyConfig::new(cli.api_key));

    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await?;
    info!(port = cli.port, "Starting wanbridge proxy");

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    serve(listener, state, cancel).await
}
