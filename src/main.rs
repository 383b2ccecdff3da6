//! Flowgate: web front end for triggering external automation flows.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │                   FLOWGATE                    │
//!                  │                                               │
//!   POST /trigger  │  ┌──────────┐   ┌───────────┐   ┌──────────┐ │
//!   ───────────────┼─▶│ security │──▶│  trigger  │──▶│ outbound │─┼──▶ Flow
//!                  │  │rate limit│   │dispatcher │   │   GET    │ │    target
//!                  │  └──────────┘   └─────┬─────┘   └──────────┘ │
//!                  │                       │                      │
//!                  │                       ▼                      │
//!   Redirect +     │  ┌──────────┐   ┌───────────┐               │
//!   notice         │  │ registry │   │   audit   │               │
//!   ◀──────────────┼──│ (flows)  │   │ CSV log   │               │
//!                  │  └──────────┘   └───────────┘               │
//!                  └───────────────────────────────────────────────┘
//! ```
//!
//! Every terminal trigger state except not-found and rate-limited appends
//! exactly one audit record.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowgate::config::loader;
use flowgate::{AppConfig, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "flowgate", about = "Web front end for triggering automation flows")]
struct Args {
    /// Path to the TOML config file. Missing file means defaults.
    #[arg(long, default_value = "flowgate.toml")]
    config: PathBuf,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "flowgate starting");

    let args = Args::parse();
    let mut config: AppConfig = loader::load_or_default(&args.config)?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        flows_file = %config.registry.flows_file.display(),
        audit_log = %config.audit.log_path.display(),
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => flowgate::observability::metrics::init_metrics(addr),
            Err(error) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                %error,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
