//! # Proxy Herd Node Runtime
//!
//! Runs one named server of the herd.
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration (file, then `HERD_*` environment overrides)
//! 3. Resolve this server's identity in the topology
//! 4. Initialize logging (console, optional per-server file)
//! 5. Wire store, dispatcher and propagator; bind the listener
//! 6. Serve until Ctrl-C

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use node_runtime::{
    default_log_file, init_logging, nearby_client, HerdConfig, HerdNode, HerdServer, LogConfig,
};

/// One server of the proxy herd.
#[derive(Parser, Debug)]
#[command(name = "node-runtime")]
#[command(about = "Proxy herd server", long_about = None)]
#[command(version)]
struct Args {
    /// Name of this server in the herd topology
    server_name: String,

    /// Herd configuration file (TOML); defaults to the built-in herd
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write logs to a file; defaults to <SERVER_NAME>_log.txt
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    log_file: Option<Option<PathBuf>>,

    /// Emit console logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        HerdConfig::load(args.config.as_deref()).context("Failed to load herd configuration")?;
    config.apply_env_overrides();

    let identity = config
        .topology
        .identity(&args.server_name)
        .with_context(|| format!("Bad server name {:?}", args.server_name))?
        .clone();

    init_logging(&LogConfig {
        level: args.log_level.clone(),
        json: args.json_logs,
        file: args
            .log_file
            .map(|path| path.unwrap_or_else(|| default_log_file(&identity.name))),
    })
    .context("Failed to initialize logging")?;

    info!(server = %identity.name, "--- {} starts ---", identity.name);

    let nearby = nearby_client(&config.places);
    let node = HerdNode::new(&identity.name, config, nearby)?;
    let server = HerdServer::bind(&identity.name, identity.address, node.connection_handler())
        .await
        .with_context(|| format!("Failed to bind {}", identity.address))?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let running = tokio::spawn(server.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    shutdown_tx.send(true).ok();
    running.await.context("Server task failed")?;

    info!(server = %identity.name, "--- {} closes ---", identity.name);
    Ok(())
}
