//! Rank gateway.
//!
//! ```text
//!   caller ── POST /rank-user ──▶ auth ──▶ validate ──▶ RankingService ──▶ Open Cloud
//!                                                         │
//!                                                     RoleCache
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rank_gateway::config::load_config;
use rank_gateway::lifecycle::{signals, Shutdown};
use rank_gateway::observability::{logging, metrics};
use rank_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "rank-gateway")]
#[command(about = "Authenticated HTTP gateway for Roblox group ranking", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "RANK_GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("rank-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        group_id = %config.opencloud.group_id,
        request_timeout_secs = config.timeouts.request_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(&shutdown);

    let server = HttpServer::from_config(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
