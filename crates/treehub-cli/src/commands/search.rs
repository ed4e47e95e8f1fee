//! File name search command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use treehub_core::error::AppError;
use treehub_service::{RequestContext, Services};

use crate::output::{self, OutputFormat};

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive substring of the file name (empty lists all)
    #[arg(default_value = "")]
    pub query: String,
}

#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    id: String,
    name: String,
    path: String,
    size: i64,
    folder_id: String,
}

/// Execute the search command
pub async fn execute(
    args: &SearchArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let files = services.search.search(&ctx.owner, &args.query).await?;
    let rows: Vec<FileRow> = files
        .into_iter()
        .map(|f| FileRow {
            id: f.id.to_string(),
            name: f.name,
            path: f.logical_path,
            size: f.size,
            folder_id: f.folder_id.to_string(),
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}
