//! CLI entrypoint for chat-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection and serves the HTTP surface.

use anyhow::{Context, Result};
use clap::Parser;
use relay_application::HistoryRecorder;
use relay_infrastructure::{AppwriteHistoryStore, ConfigLoader, OpenAiCompatibleGateway};
use relay_presentation::{AppState, Cli};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config_sources {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    init_tracing(cli.verbose, cli.log_json);

    info!("Starting chat-relay");

    let config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiCompatibleGateway::new(config.provider_settings()?)?);

    let recorder = match config.storage_settings()? {
        Some(settings) => HistoryRecorder::new(Arc::new(AppwriteHistoryStore::new(settings)?)),
        None => {
            warn!("No history store configured; conversation turns will not be recorded");
            HistoryRecorder::disabled()
        }
    };

    let state = AppState::new(gateway, recorder, config.defaults.clone());

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let addr = tokio::net::lookup_host((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to resolve {}:{}", host, port))?
        .next()
        .with_context(|| format!("No address found for {}:{}", host, port))?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown signal received");
                    shutdown.cancel();
                }
                Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
            }
        }
    });

    relay_presentation::serve(state, addr, shutdown)
        .await
        .context("HTTP server failed")?;

    info!("chat-relay stopped");
    Ok(())
}

/// Initialize logging from the verbosity level; `RUST_LOG` takes precedence when set.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
