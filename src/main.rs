//! Spiracle access gate
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser ──▶ http::server ──┬─▶ http::edge ──▶ placeholder pages
//!                              │
//!                              └─▶ security::guard ──▶ /api/auth ──▶ auth (password, token, cookie)
//!                                  (CORS, rate limit)  /api/chat ──▶ auth ──▶ upstream::webhook ──▶ n8n
//!
//!   Cross-cutting: config, observability (tracing, metrics), lifecycle (shutdown, signals)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use spiracle_gate::config::load_config;
use spiracle_gate::lifecycle::signals::wait_for_shutdown_signal;
use spiracle_gate::observability::{logging, metrics};
use spiracle_gate::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "spiracle-gate")]
#[command(about = "Access gate for the Spiracle chat", long_about = None)]
struct Args {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("spiracle-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = ?config.environment,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.auth.shared_secret.is_none() {
        tracing::error!("DEMO_PASSWORD is not set; every login will be rejected");
    }
    if config.webhook.url.is_none() {
        tracing::error!("N8N_WEBHOOK_URL is not set; chat requests will fail");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_shutdown_signal().await;
    shutdown.trigger();

    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
