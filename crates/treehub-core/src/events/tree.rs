//! Tree mutation events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events produced by rename, delete, and bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TreeEvent {
    /// A folder was renamed.
    FolderRenamed {
        /// The folder ID.
        folder_id: Uuid,
        /// Name before the rename.
        old_name: String,
        /// Name after the rename.
        new_name: String,
    },
    /// One batch delete call removed these nodes.
    NodesDeleted {
        /// Names of every top-level folder and file removed.
        names: Vec<String>,
    },
    /// Files were registered in a folder in one upload.
    FilesUploaded {
        /// The receiving folder.
        folder_id: Uuid,
        /// The receiving folder's path.
        folder_path: String,
        /// Names of the uploaded files.
        names: Vec<String>,
    },
}

impl TreeEvent {
    /// Render the event as a notification message.
    pub fn render(&self, actor: &str) -> String {
        match self {
            Self::FolderRenamed {
                old_name, new_name, ..
            } => format!("{actor} renamed folder \"{old_name}\" to \"{new_name}\""),
            Self::NodesDeleted { names } => {
                format!("{actor} deleted {}", quoted_list(names))
            }
            Self::FilesUploaded {
                folder_path, names, ..
            } => format!(
                "{actor} uploaded {} file(s) to {folder_path}: {}",
                names.len(),
                quoted_list(names)
            ),
        }
    }
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
