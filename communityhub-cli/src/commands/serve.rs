//! HTTP server command
//!
//! Runs the CommunityHub API with the database health gate in front of
//! every route.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use communityhub_server::db::migrations;
use communityhub_server::http::{run_server, AppState, ServerConfig};

use crate::config::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to [default: 127.0.0.1, or 0.0.0.0 in production]
    #[arg(long, short = 'b', env = "BIND")]
    pub bind: Option<IpAddr>,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Only allow the local frontend dev origins instead of any origin
    #[arg(long)]
    pub cors_strict: bool,

    /// Create missing tables once the database is reachable
    #[arg(long)]
    pub migrate: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.db.into_config();
    let default_ip = if config.environment.is_production() {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    };
    let bind_addr = SocketAddr::new(args.bind.unwrap_or(default_ip), args.port);

    let state = AppState::new(config);

    if args.migrate {
        if state.db.ensure_connected().await {
            migrations::run(&state.pool)
                .await
                .context("Failed to run migrations")?;
        } else {
            tracing::warn!("Skipping migrations: database unavailable");
        }
    }

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: !args.cors_strict,
    };

    // Run server (blocks until shutdown)
    run_server(state, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
