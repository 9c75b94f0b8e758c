//! raw-proxy
//!
//! A single-endpoint reverse proxy in front of a raw content host.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                  RAW PROXY                   │
//!                       │                                              │
//!     Client Request    │  ┌────────┐   ┌────────────┐   ┌──────────┐  │
//!     ──────────────────┼─▶│  http  │──▶│  security  │──▶│ routing  │  │
//!                       │  │ server │   │ authorizer │   │ resolver │  │
//!                       │  └───┬────┘   └────────────┘   └────┬─────┘  │
//!                       │      │ "/" → decoy page             │        │
//!                       │      ▼                              ▼        │
//!     Client Response   │  ┌────────┐   ┌────────────┐   ┌──────────┐  │
//!     ◀─────────────────┼──│response│◀──│  headers   │◀──│ upstream │◀─┼── Content
//!                       │  │ errors │   │  sanitize  │   │  client  │  │    Host
//!                       │  └────────┘   └────────────┘   └──────────┘  │
//!                       │                                              │
//!                       │   config · observability · lifecycle         │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use raw_proxy::config::load_config;
use raw_proxy::observability::{init_logging, metrics};
use raw_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "raw-proxy")]
#[command(about = "Token-gated reverse proxy for raw repository content", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding configuration (e.g., 0.0.0.0:8080).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut vars: Vec<(String, String)> = std::env::vars().collect();
    if let Some(bind) = cli.bind {
        vars.push(("BIND_ADDRESS".to_string(), bind));
    }
    let config = load_config(cli.config.as_deref(), vars)?;

    init_logging(&config.observability)?;
    tracing::info!("raw-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
