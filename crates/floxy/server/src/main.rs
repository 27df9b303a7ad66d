//! Floxy UI - workflow dashboard server
//!
//! Serves the workflow API and the web UI from one process. Configuration
//! comes from the environment (`PORT`, `DB_HOST`, `DB_PORT`, `DB_NAME`,
//! `DB_USER`, `DB_PASSWORD`, ...); the flags below only control logging.

use clap::Parser;
use floxy_ui::{shutdown_signal, Config, Lifecycle, Server};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Floxy UI CLI
#[derive(Parser)]
#[command(name = "floxy-ui")]
#[command(about = "Floxy UI - workflow API and web dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level, overridden by RUST_LOG
    #[arg(long, env = "FLOXY_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "FLOXY_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
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

    let config = Config::load();
    tracing::debug!(?config, "Loaded configuration");

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create server");
            return ExitCode::FAILURE;
        }
    };

    let lifecycle = Arc::new(Lifecycle::new(server));

    let signal_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_lifecycle.stop().await;
    });

    let result = lifecycle.start().await;
    lifecycle.stop().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
