//! CLI command definitions and dispatch.

pub mod migrate;
pub mod notification;
pub mod search;
pub mod share;
pub mod tree;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use treehub_core::config::AppConfig;
use treehub_core::error::AppError;
use treehub_database::Stores;
use treehub_service::{RequestContext, Services};

use crate::output::OutputFormat;

/// TreeHub: multi-tenant folder tree administration
#[derive(Debug, Parser)]
#[command(name = "treehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Username recorded as the actor of mutations
    #[arg(long, default_value = "admin", global = true)]
    pub actor: String,

    /// Tenant the command acts for
    #[arg(long, default_value = "@admin", global = true)]
    pub owner: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder tree management
    Tree(tree::TreeArgs),
    /// Folder access grants
    Share(share::ShareArgs),
    /// Search file names
    Search(search::SearchArgs),
    /// Notification log
    Notification(notification::NotificationArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let ctx = RequestContext::new(self.actor.clone(), self.owner.clone());
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Tree(args) => {
                tree::execute(args, &connect(&config).await?, &ctx, self.format).await
            }
            Commands::Share(args) => {
                share::execute(args, &connect(&config).await?, &ctx, self.format).await
            }
            Commands::Search(args) => {
                search::execute(args, &connect(&config).await?, &ctx, self.format).await
            }
            Commands::Notification(args) => {
                notification::execute(args, &connect(&config).await?, &ctx, self.format).await
            }
        }
    }
}

/// Helper: connect the configured store and wire the services
async fn connect(config: &AppConfig) -> Result<Services, AppError> {
    let stores = Stores::connect(config).await?;
    Ok(Services::new(stores, config))
}

/// Helper: parse a UUID argument
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|e| AppError::validation(format!("Invalid UUID '{raw}': {e}")))
}

/// Helper: parse a list of UUID arguments
pub fn parse_ids(raw: &[String]) -> Result<Vec<Uuid>, AppError> {
    raw.iter().map(|r| parse_id(r)).collect()
}
