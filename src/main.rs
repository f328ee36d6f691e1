#![forbid(unsafe_code)]

//! `helpdesk-bot`: Slack helpdesk intake server binary.
//!
//! Bootstraps configuration, selects the state store, builds the Slack
//! client and intake flow, and serves the webhook and health endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use helpdesk_bot::config::GlobalConfig;
use helpdesk_bot::intake::IntakeFlow;
use helpdesk_bot::server::{self, AppState};
use helpdesk_bot::slack::client::SlackService;
use helpdesk_bot::state::build_store;
use helpdesk_bot::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "helpdesk-bot", about = "Slack helpdesk intake bot", version, long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the HTTP port (takes precedence over `PORT`).
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    install_panic_hook();
    info!("helpdesk-bot bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = match &args.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    config.apply_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    config.load_credentials().await?;

    let config = Arc::new(config);
    info!(
        state_backend = config.state.backend.as_str(),
        trigger = ?config.trigger.policy,
        "configuration loaded"
    );

    // ── Build collaborators ─────────────────────────────
    let store = build_store(&config.state)?;
    let slack = SlackService::new(&config.slack).map_err(|err| {
        error!(%err, "slack client start failed");
        err
    })?;
    let flow = Arc::new(IntakeFlow::new(Arc::new(slack), config.trigger.clone()));
    let state = Arc::new(AppState::new(Arc::clone(&config), store, flow));

    // ── Serve until shutdown ────────────────────────────
    let ct = CancellationToken::new();
    let server_ct = ct.clone();
    let server_state = Arc::clone(&state);
    let mut server_handle =
        tokio::spawn(async move { server::serve(server_state, server_ct).await });

    let finished_early = tokio::select! {
        () = shutdown_signal() => None,
        joined = &mut server_handle => Some(joined),
    };
    let joined = match finished_early {
        Some(joined) => joined,
        None => {
            info!("shutdown signal received");
            ct.cancel();
            server_handle.await
        }
    };

    joined.map_err(|err| AppError::Io(format!("server task panicked: {err}")))??;
    info!("helpdesk-bot shut down");
    Ok(())
}

/// Log panics through tracing before the default hook reports them.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!(%panic_info, "uncaught panic");
        default_hook(panic_info);
    }));
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
