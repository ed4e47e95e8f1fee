//! Database migration management commands.

use clap::{Args, Subcommand};

use treehub_core::config::{AppConfig, StoreBackend};
use treehub_core::error::AppError;
use treehub_database::DatabasePool;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            if config.store.backend != StoreBackend::Postgres {
                output::print_warning("The memory backend has no schema; nothing to migrate.");
                return Ok(());
            }
            let pool = DatabasePool::connect(&config.database).await?;
            println!("Running database migrations...");
            treehub_database::migration::run_migrations(pool.pool()).await?;
            pool.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }
    Ok(())
}
