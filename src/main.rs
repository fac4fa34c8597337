//! auth-gate server binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                      AUTH GATE                        │
//!                  │                                                       │
//!   Request        │  ┌──────────┐   ┌──────────────┐   ┌──────────────┐  │
//!   ───────────────┼─▶│  trace / │──▶│     gate     │──▶│ application  │  │
//!                  │  │ req. id  │   │  middleware  │   │   handlers   │  │
//!                  │  └──────────┘   └──────┬───────┘   └──────────────┘  │
//!                  │                        │                              │
//!                  │          ┌─────────────┴─────────────┐                │
//!                  │          ▼                           ▼                │
//!                  │  ┌──────────────┐           ┌────────────────┐       │
//!                  │  │ PublicRoutes │           │  AuthStrategy  │       │
//!                  │  │  (registry)  │           │ basic / bearer │       │
//!                  │  └──────▲───────┘           └────────────────┘       │
//!                  │         │ append-only                                 │
//!                  │  ┌──────┴───────┐                                    │
//!                  │  │ config reload│                                    │
//!                  │  └──────────────┘                                    │
//!                  └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use auth_gate::config::{load_config, ConfigWatcher};
use auth_gate::lifecycle::{shutdown_on_signal, Shutdown};
use auth_gate::observability::{logging, metrics};
use auth_gate::GateServer;

#[derive(Parser)]
#[command(name = "auth-gate")]
#[command(about = "Serve an application behind a pluggable authentication gate", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "auth-gate.toml")]
    config: PathBuf,

    /// Reload public routes when the configuration file changes
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("auth-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        public_routes = config.gate.public_routes.len(),
        scheme = ?config.auth.scheme,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = if cli.watch {
        let (watcher, updates) = ConfigWatcher::new(&cli.config);
        (Some(watcher.run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = GateServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
