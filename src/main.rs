//! Trading-chat API gateway.
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                    GATEWAY                    │
//!   Browser  /api/...     │  ┌─────────┐   ┌──────────┐   ┌───────────┐   │
//!   ──────────────────────┼─▶│ session │──▶│ handlers │──▶│ forwarder │───┼──▶ Backend API
//!                         │  │ cookies │   │auth check│   │ deadline  │   │
//!                         │  └─────────┘   └──────────┘   └─────┬─────┘   │
//!   ◀─────────────────────┼── Set-Cookie + JSON / text stream ◀─┘         │
//!                         │                 normalizer                    │
//!                         └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use tradechat_gateway::config::{
    apply_process_env, load_config, validate_config, ConfigError, GatewayConfig,
};
use tradechat_gateway::lifecycle::{wait_for_signal, Shutdown};
use tradechat_gateway::observability::{logging, metrics};
use tradechat_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "tradechat-gateway")]
#[command(about = "API gateway for the trading-chat frontend", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    apply_process_env(&mut config);
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config);
    tracing::info!("tradechat-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on(wait_for_signal());

    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
