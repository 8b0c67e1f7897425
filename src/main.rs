//! RÚIAN address gateway
//!
//! A small HTTP gateway in front of the Czech address registry
//! (`vdp.cuzk.gov.cz`), built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                  ADDRESS GATEWAY                 │
//!                         │                                                  │
//!     Client Request      │  ┌─────────┐    ┌─────────┐    ┌────────────┐    │
//!     ────────────────────┼─▶│  http   │───▶│ routing │───▶│  upstream  │────┼───▶ vdp.cuzk.gov.cz
//!                         │  │ server  │    │ decision│    │   client   │    │
//!                         │  └─────────┘    └─────────┘    └─────┬──────┘    │
//!                         │                                      │           │
//!                         │                         detail route ▼           │
//!     Client Response     │  ┌──────────┐              ┌────────────────┐    │
//!     ◀───────────────────┼──│ response │◀─────────────│   transcode    │    │
//!                         │  │ + CORS   │◀─ autocomplete (raw bytes)    │    │
//!                         │  └──────────┘              └────────────────┘    │
//!                         │                                                  │
//!                         │  config · observability · lifecycle              │
//!                         └──────────────────────────────────────────────────┘
//! ```
//!
//! # Routes
//! - `GET /autocomplete?adresa=...` relays the full-text search
//! - `GET /detail?kod=...` fetches the XML export and returns it as flat JSON
//! - `OPTIONS *` answers CORS preflights

use std::path::PathBuf;

use clap::Parser;

use ruian_gateway::config::loader::resolve_config;
use ruian_gateway::lifecycle::{self, Shutdown};
use ruian_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "ruian-gateway")]
#[command(about = "HTTP gateway for the RÚIAN address registry", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.port)?;

    logging::init_logging(&config.observability);

    tracing::info!("ruian-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
