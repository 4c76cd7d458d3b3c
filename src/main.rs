//! trace-chain hop
//!
//! Runs one hop of a trace chain.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                     HOP                       │
//!   X-Entry-Tid: A      │  ┌────────────┐   ┌───────┐   ┌───────────┐  │   X-Entry-Tid: A
//!   X-Curr-Tid:  B  ────┼─▶│ read/embed │──▶│handler│──▶│chain+write│──┼─▶ X-Curr-Tid:  C
//!   X-Prev-Tid:  A      │  └────────────┘   └───────┘   └───────────┘  │   X-Prev-Tid:  B
//!                       └──────────────────────────────────────────────┘
//! ```
//!
//! Without an upstream the hop answers with its own identity as JSON.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use trace_chain::config::{load_config, validation::validate_config, ConfigError, HopConfig};
use trace_chain::lifecycle::{signals, Shutdown};
use trace_chain::observability::init_logging;
use trace_chain::HttpServer;

#[derive(Parser)]
#[command(name = "trace-chain")]
#[command(about = "Trace-propagating HTTP hop", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override upstream.url.
    #[arg(short, long)]
    upstream: Option<String>,
}

fn build_config(args: Args) -> Result<HopConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => HopConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = args.upstream {
        config.upstream.url = Some(upstream);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(Args::parse())?;

    init_logging(&config.logging)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = config.upstream.url.as_deref().unwrap_or("none"),
        generator = ?config.trace.generator,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    tokio::spawn(signals::trigger_on_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(config);
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
