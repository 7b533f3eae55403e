/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Market data reports, account reports, streamed private events
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kucoin_cli::{CliConfig, Command, commands};

#[derive(Parser, Debug)]
#[command(name = "kucoin-cli", version, about = "KuCoin spot REST and private WebSocket client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Validate the configuration and exit
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(config = %args.config_path.display(), dry_run = args.dry_run, "kucoin-cli starting");

    let config = load_config(&args.config_path)?;
    let client = config.build_client()?;
    info!(
        base_url = %client.base_url(),
        authenticated = client.credentials().is_some(),
        "configuration loaded"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let Some(command) = args.command else {
        bail!("no command given; see --help");
    };

    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    commands::run(&command, &client, config.ws_config(), shutdown)
        .await
        .with_context(|| format!("{command:?} failed"))?;

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber: {err}"))
}

fn load_config(path: &Path) -> Result<CliConfig> {
    let path = path.to_str().context("config path must be valid utf-8")?;
    CliConfig::from_file(path).context("load config")
}

/// Cancel `shutdown` on the first SIGINT or SIGTERM
fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        info!(signal, "shutdown signal received");
        shutdown.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            warn!(error = %err, "SIGTERM handler unavailable; listening for SIGINT only");
            return wait_for_ctrl_c().await;
        }
    };
    tokio::select! {
        name = wait_for_ctrl_c() => name,
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() -> &'static str {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "SIGINT handler unavailable");
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
