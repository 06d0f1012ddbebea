//! Web wallet (v1)
//!
//! A browser wallet front-end built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  WEB WALLET                   │
//!   Browser request    │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ───────────────────┼─▶│  http   │──▶│ session │──▶│  handlers  │  │
//!                      │  │ server  │   │  gate   │   │ forms/views│  │
//!                      │  └─────────┘   └────┬────┘   └─────┬──────┘  │
//!                      │                     │              │         │
//!                      │              ┌──────▼─────┐  ┌─────▼──────┐  │
//!                      │              │  account   │  │ blockchain │──┼──▶ RPC node
//!                      │              │  binding   │  │   client   │──┼──▶ Faucet
//!                      │              └────────────┘  └────────────┘  │
//!                      │  config · observability · lifecycle          │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use web_wallet::config::{load_config, validate_config, BindingMode, WalletConfig};
use web_wallet::lifecycle::{bootstrap, signals, Shutdown};
use web_wallet::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "web-wallet")]
#[command(about = "Browser front-end for a blockchain wallet", long_about = None)]
struct Cli {
    /// Server bind address (overrides the config file)
    #[arg(short = 's', long = "bind")]
    bind: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Redirect unauthenticated callers to /login
    #[arg(long)]
    login_required: Option<bool>,

    /// Account binding policy
    #[arg(long, value_enum)]
    mode: Option<BindingMode>,

    /// Directory holding css/, js/ and images/
    #[arg(long)]
    assets_dir: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut WalletConfig) {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(login_required) = self.login_required {
            config.session.login_required = login_required;
        }
        if let Some(mode) = self.mode {
            config.session.mode = mode;
        }
        if let Some(assets_dir) = self.assets_dir {
            config.assets_dir = assets_dir;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WalletConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    logging::init_logging(config.observability.log_format);

    tracing::info!("web-wallet v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.session.mode,
        login_required = config.session.login_required,
        rpc_url = %config.blockchain.rpc_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(config.listener.socket_address()).await?;
    let server = bootstrap(config).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
