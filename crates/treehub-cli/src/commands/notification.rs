//! Notification log commands.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use treehub_core::error::AppError;
use treehub_entity::notification::ReadFilter;
use treehub_service::{RequestContext, Services};

use crate::output::{self, OutputFormat};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List notifications, unread first
    List {
        /// Read-state filter
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
    },
    /// Mark one notification read
    Read {
        /// Notification ID
        id: String,
    },
    /// Mark every notification in scope read
    ReadAll,
}

/// Read-state filter values
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FilterArg {
    All,
    Read,
    Unread,
}

impl From<FilterArg> for ReadFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Read => Self::Read,
            FilterArg::Unread => Self::Unread,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    id: String,
    owner: String,
    read: bool,
    created_at: String,
    message: String,
}

/// Execute notification commands
pub async fn execute(
    args: &NotificationArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let notifications = &services.notifications;

    match &args.command {
        NotificationCommand::List { filter } => {
            let rows: Vec<NotificationRow> = notifications
                .list(&ctx.owner, (*filter).into())
                .await?
                .into_iter()
                .map(|n| NotificationRow {
                    id: n.id.to_string(),
                    owner: n.owner,
                    read: n.read,
                    created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    message: n.message,
                })
                .collect();
            output::print_list(&rows, format);
        }
        NotificationCommand::Read { id } => {
            notifications.mark_read(super::parse_id(id)?).await?;
            output::print_success(&format!("Notification {id} marked read"));
        }
        NotificationCommand::ReadAll => {
            let changed = notifications.mark_all_read(&ctx.owner).await?;
            output::print_success(&format!("{changed} notification(s) marked read"));
        }
    }
    Ok(())
}
