//! Folder access grant commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use treehub_core::error::AppError;
use treehub_entity::permission::AccessLevel;
use treehub_service::{RequestContext, Services};

use super::parse_id;
use crate::output::{self, OutputFormat};

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// Give users exactly one access level on a folder
    Grant {
        /// Folder ID
        folder_id: String,
        /// Usernames
        #[arg(required = true)]
        usernames: Vec<String>,
        /// Access level: read, write or read-write
        #[arg(short, long, default_value = "read")]
        level: String,
    },
    /// Remove every grant a user holds on a folder
    Revoke {
        /// Folder ID
        folder_id: String,
        /// Username
        username: String,
    },
    /// Show a user's role on a folder
    Role {
        /// Folder ID
        folder_id: String,
        /// Username
        username: String,
    },
    /// List a folder's grantees
    List {
        /// Folder ID
        folder_id: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct GranteeRow {
    username: String,
    first_name: String,
    last_name: String,
    role: String,
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let access = &services.access;

    match &args.command {
        ShareCommand::Grant {
            folder_id,
            usernames,
            level,
        } => {
            let level: AccessLevel = level.parse()?;
            access
                .grant_many(ctx, parse_id(folder_id)?, usernames, level)
                .await?;
            output::print_success(&format!(
                "Granted {level} on {folder_id} to {}",
                usernames.join(", ")
            ));
        }
        ShareCommand::Revoke {
            folder_id,
            username,
        } => {
            access.revoke(ctx, parse_id(folder_id)?, username).await?;
            output::print_success(&format!("Revoked {username} on {folder_id}"));
        }
        ShareCommand::Role {
            folder_id,
            username,
        } => {
            let role = access.role_of(parse_id(folder_id)?, username).await?;
            match format {
                OutputFormat::Json => output::print_json(&role),
                OutputFormat::Table => output::print_kv(username, role.as_str()),
            }
        }
        ShareCommand::List { folder_id } => {
            let rows: Vec<GranteeRow> = access
                .list_grantees(parse_id(folder_id)?)
                .await?
                .into_iter()
                .map(|g| GranteeRow {
                    username: g.username,
                    first_name: g.first_name.unwrap_or_default(),
                    last_name: g.last_name.unwrap_or_default(),
                    role: g.role.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
