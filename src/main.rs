//! CLI Entry Point for window_average
//!
//! # Usage
//!
//! Start the service:
//! ```bash
//! window_average serve --config config/window_average.toml
//! ```
//!
//! Run offline against the built-in series:
//! ```bash
//! window_average serve --mock --port 9876
//! ```
//!
//! Check a configuration file:
//! ```bash
//! window_average check-config --config config/window_average.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use window_average::config::{ServiceConfig, UpstreamMode, DEFAULT_CONFIG_PATH};
use window_average::http::{start_server, AppState};
use window_average::logging;

#[cfg(not(test))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "window_average")]
#[command(about = "Sliding-window average service for prime, fibonacci, even and random numbers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service
    Serve {
        /// Configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,

        /// Serve the built-in series instead of calling the upstream provider
        #[arg(long)]
        mock: bool,
    },

    /// Load and validate a configuration file
    CheckConfig {
        /// Configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, port, mock } => serve(config, port, mock).await,
        Commands::CheckConfig { config } => check_config(config),
    }
}

fn load_config(path: &Path) -> Result<ServiceConfig> {
    let config = ServiceConfig::load_from(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(config)
}

async fn serve(config_path: PathBuf, port: Option<u16>, mock: bool) -> Result<()> {
    let mut config = load_config(&config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if mock {
        config.upstream.mode = UpstreamMode::Mock;
    }
    config.validate()?;
    logging::init_from_config(&config)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.host))?;

    let state = Arc::new(AppState::from_config(&config)?);
    let handle = start_server(state, addr).await?;

    tracing::info!(
        service = %config.application.name,
        addr = %handle.local_addr(),
        upstream = ?config.upstream.mode,
        fallback = ?config.upstream.fallback,
        default_window_size = config.server.default_window_size,
        "Service ready - press Ctrl+C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    tracing::info!("Shutting down");
    handle.shutdown().await?;
    Ok(())
}

fn check_config(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)?;
    config.validate()?;

    println!("Configuration OK: {}", config_path.display());
    println!("  service:             {}", config.application.name);
    println!("  listen:              {}:{}", config.server.host, config.server.port);
    match config.server.window_size_limit() {
        Some(max) => println!(
            "  window size:         default {}, max {}",
            config.server.default_window_size, max
        ),
        None => println!(
            "  window size:         default {}, no limit",
            config.server.default_window_size
        ),
    }
    println!("  upstream mode:       {:?}", config.upstream.mode);
    println!("  upstream base_url:   {}", config.upstream.base_url);
    println!("  upstream timeout:    {} ms", config.upstream.timeout_ms);
    println!("  fallback:            {:?}", config.upstream.fallback);
    if config.rate_limit.requests_per_window == 0 {
        println!("  rate limit:          disabled");
    } else {
        println!(
            "  rate limit:          {} requests / {} s",
            config.rate_limit.requests_per_window, config.rate_limit.window_secs
        );
    }
    Ok(())
}
