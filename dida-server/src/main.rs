//! Dida development backend.
//!
//! An axum server keeping tasks and projects in memory, for local
//! development of the `dida` terminal client.
//!
//! ```bash
//! # Default address 127.0.0.1:3000, empty store
//! cargo run --bin dida-server
//!
//! # Demo data and a custom account
//! cargo run --bin dida-server -- --seed-demo --username alice --password wonderland
//! ```

use std::sync::Arc;

use clap::Parser;
use dida_server::config::{ServerCliArgs, ServerConfig};
use dida_server::server::{self, ServerState};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = Arc::new(ServerState::new(config.credentials.clone()));
    if config.seed_demo
        && let Err(e) = state.store.seed_demo().await
    {
        tracing::error!(error = %e, "failed to seed demo data");
        std::process::exit(1);
    }

    tracing::info!(addr = %config.bind_addr, "starting dida server");

    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "dida server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "dida server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start dida server");
            std::process::exit(1);
        }
    }
}
