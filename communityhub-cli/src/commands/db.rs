//! Database maintenance commands: check, migrate, seed

use anyhow::{bail, Context, Result};
use clap::Parser;

use communityhub_server::db::{migrations, seed};
use communityhub_server::AppState;

use crate::config::DbArgs;

#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Delete existing events, polls and announcements before inserting samples
    #[arg(long)]
    pub reset: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run one connection cycle, creating the database if needed.
async fn connect(db: DbArgs) -> Result<AppState> {
    let state = AppState::new(db.into_config());

    if !state.db.ensure_connected().await {
        let snapshot = state.db.snapshot().await;
        bail!(
            "database unavailable: {}",
            snapshot.last_error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(state)
}

pub async fn run_check(args: CheckArgs) -> Result<()> {
    let state = connect(args.db).await?;
    let config = state.db.config();

    println!(
        "✅ Connected to {}:{}/{} ({})",
        config.resolved_host().unwrap_or_default(),
        config.port,
        config.database,
        config.environment
    );
    Ok(())
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let state = connect(args.db).await?;

    migrations::run(&state.pool)
        .await
        .context("Failed to run migrations")?;

    println!("✅ Migrations applied");
    Ok(())
}

pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let state = connect(args.db).await?;

    migrations::run(&state.pool)
        .await
        .context("Failed to run migrations")?;
    let summary = seed::run(&state.pool, args.reset)
        .await
        .context("Failed to seed sample data")?;

    println!(
        "✅ Seeded {} events, {} polls, {} announcements",
        summary.events, summary.polls, summary.announcements
    );
    Ok(())
}
