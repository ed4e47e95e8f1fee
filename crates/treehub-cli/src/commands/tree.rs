//! Folder tree management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_entity::folder::{Folder, PopulateDepth, PopulatedFolder};
use treehub_service::{NodeRef, RequestContext, Services};

use super::{parse_id, parse_ids};
use crate::output::{self, OutputFormat};

/// Arguments for tree commands
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Tree subcommand
    #[command(subcommand)]
    pub command: TreeCommand,
}

/// Folders and files a batch command acts on
#[derive(Debug, Args)]
pub struct NodeArgs {
    /// Folder IDs
    #[arg(long = "folder")]
    pub folders: Vec<String>,
    /// File IDs
    #[arg(long = "file")]
    pub files: Vec<String>,
}

impl NodeArgs {
    fn nodes(&self) -> Result<Vec<NodeRef>, AppError> {
        let mut nodes: Vec<NodeRef> = parse_ids(&self.folders)?
            .into_iter()
            .map(NodeRef::folder)
            .collect();
        nodes.extend(parse_ids(&self.files)?.into_iter().map(NodeRef::file));
        if nodes.is_empty() {
            return Err(AppError::validation(
                "Name at least one --folder or --file",
            ));
        }
        Ok(nodes)
    }
}

/// Tree subcommands
#[derive(Debug, Subcommand)]
pub enum TreeCommand {
    /// List the owner's root folders
    Roots,
    /// Create a folder (a root when no parent is given)
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID
        #[arg(short, long)]
        parent_id: Option<String>,
    },
    /// Show a folder with its subfolders and files
    Show {
        /// Folder ID or materialized path (`/acme/docs/`)
        folder: String,
        /// Resolve the whole subtree
        #[arg(long)]
        full: bool,
    },
    /// Rename a folder and rewrite its subtree paths
    Rename {
        /// Folder ID
        id: String,
        /// New name
        name: String,
    },
    /// Move folders and files between two folders
    Move {
        /// Destination folder ID
        #[arg(long)]
        to: String,
        /// Current parent folder ID
        #[arg(long)]
        from: String,
        #[command(flatten)]
        nodes: NodeArgs,
    },
    /// Copy folders (deeply) and files into a folder
    Copy {
        /// Destination folder ID
        #[arg(long)]
        to: String,
        #[command(flatten)]
        nodes: NodeArgs,
    },
    /// Delete folders (with their subtrees) and files
    Delete {
        #[command(flatten)]
        nodes: NodeArgs,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    id: String,
    name: String,
    path: String,
    owner: String,
    children: usize,
    files: usize,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            path: f.path.clone(),
            owner: f.owner.clone(),
            children: f.children.len(),
            files: f.files.len(),
        }
    }
}

/// Execute tree commands
pub async fn execute(
    args: &TreeArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let tree = &services.tree;

    match &args.command {
        TreeCommand::Roots => {
            let roots = tree.list_roots(&ctx.owner).await?;
            let rows: Vec<FolderRow> = roots.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        TreeCommand::Create { name, parent_id } => {
            let folder = match parent_id {
                Some(raw) => {
                    tree.create_subfolder(ctx, parse_id(raw)?, name, &ctx.owner)
                        .await?
                }
                None => tree.create_root(ctx, name, &ctx.owner).await?,
            };
            print_folder(&folder, format);
        }
        TreeCommand::Show { folder, full } => {
            let id = resolve_folder(services, folder).await?;
            let depth = if *full {
                PopulateDepth::Full
            } else {
                PopulateDepth::Immediate
            };
            let populated = tree.populate(id, depth).await?;
            match format {
                OutputFormat::Json => output::print_json(&populated),
                OutputFormat::Table => print_tree(&populated, 0),
            }
        }
        TreeCommand::Rename { id, name } => {
            let folder = tree.rename(ctx, parse_id(id)?, name).await?;
            print_folder(&folder, format);
        }
        TreeCommand::Move { to, from, nodes } => {
            let outcome = tree
                .move_many(ctx, &nodes.nodes()?, parse_id(to)?, parse_id(from)?)
                .await?;
            output::print_outcome("Moved", &outcome, format);
        }
        TreeCommand::Copy { to, nodes } => {
            let outcome = tree.copy_many(ctx, &nodes.nodes()?, parse_id(to)?).await?;
            output::print_outcome("Copied", &outcome, format);
        }
        TreeCommand::Delete { nodes, yes } => {
            let nodes = nodes.nodes()?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete {} node(s) and everything below them?",
                        nodes.len()
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let outcome = tree.delete_many(ctx, &nodes).await?;
            output::print_outcome("Deleted", &outcome, format);
        }
    }

    Ok(())
}

/// Accept either a folder ID or a materialized path.
async fn resolve_folder(services: &Services, raw: &str) -> Result<Uuid, AppError> {
    if raw.starts_with('/') {
        Ok(services.tree.get_folder_by_path(raw).await?.id)
    } else {
        parse_id(raw)
    }
}

fn print_folder(folder: &Folder, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(folder),
        OutputFormat::Table => {
            output::print_kv("id", &folder.id.to_string());
            output::print_kv("name", &folder.name);
            output::print_kv("path", &folder.path);
            output::print_kv("owner", &folder.owner);
            if let Some(parent_id) = folder.parent_id {
                output::print_kv("parent", &parent_id.to_string());
            }
        }
    }
}

fn print_tree(node: &PopulatedFolder, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{}  ({})", node.folder.path, node.folder.id);
    for file in &node.file_objects {
        println!("{indent}  ├── {}  ({} bytes, {})", file.name, file.size, file.id);
    }
    for sub in &node.subfolders {
        print_tree(sub, depth + 1);
    }
}
