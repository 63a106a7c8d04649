//! communityhub CLI - run and maintain the CommunityHub API
//!
//! Subcommands:
//! - `serve`: HTTP API behind the database health gate
//! - `check`: one connection cycle, non-zero exit on failure
//! - `migrate`: create missing tables
//! - `seed`: insert sample events

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "communityhub",
    author,
    version,
    about = "CommunityHub API server and database tooling",
    long_about = "Serve the CommunityHub REST API over a MySQL-compatible database (TiDB). \
                  Connection settings come from flags or TIDB_* environment variables; \
                  a .env file in the working directory is loaded first."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Run one connection cycle and report the result
    Check(commands::db::CheckArgs),
    /// Create missing tables
    Migrate(commands::db::MigrateArgs),
    /// Insert sample events for local development
    Seed(commands::db::SeedArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal in deployments
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(err) = tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    }) {
        eprintln!("logging disabled: {err:#}");
    }

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Check(args) => commands::run_check(args).await,
        Commands::Migrate(args) => commands::run_migrate(args).await,
        Commands::Seed(args) => commands::run_seed(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
