#![forbid(unsafe_code)]

//! `channelwright` — Discord campaign-provisioning bot binary.
//!
//! Bootstraps configuration, the in-process task queue and its worker,
//! and the interaction webhook server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use channelwright::config::{load_campaign_channels, GlobalConfig};
use channelwright::discord::client::DiscordClient;
use channelwright::discord::verify::InteractionVerifier;
use channelwright::queue::InProcessQueue;
use channelwright::state::AppState;
use channelwright::{server, worker, AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "channelwright", about = "Discord campaign-provisioning bot", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("channelwright server bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    config.load_credentials().await?;
    let config = Arc::new(config);
    info!("configuration loaded");

    let channels = load_campaign_channels(&config.channels_path);
    info!(count = channels.len(), "campaign channel templates loaded");

    // ── Build shared application state ──────────────────
    let verifier = InteractionVerifier::from_hex(&config.discord.public_key)?;
    let discord = Arc::new(DiscordClient::new(&config.discord));
    let (queue, queue_rx) = InProcessQueue::channel(config.queue_capacity);

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        channels,
        verifier,
        discord,
        queue: Arc::new(queue),
    });

    // ── Start worker and webhook server ─────────────────
    let ct = CancellationToken::new();
    let worker_handle = worker::spawn(Arc::clone(&state), queue_rx, ct.clone());

    let server_ct = ct.clone();
    let server_state = Arc::clone(&state);
    let server_handle = tokio::spawn(async move {
        if let Err(err) = server::serve(server_state, server_ct).await {
            error!(%err, "webhook server failed");
        }
    });

    info!("channelwright ready");

    // ── Wait for shutdown signal ────────────────────────
    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    let _ = tokio::join!(worker_handle, server_handle);
    info!("channelwright shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
