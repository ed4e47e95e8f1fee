//! Hydrated folder views for presentation.

use serde::{Deserialize, Serialize};

use super::model::Folder;
use crate::file::File;

/// How far [`PopulatedFolder`] hydration descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopulateDepth {
    /// Only the folder's direct subfolders and files.
    Immediate,
    /// The whole subtree.
    Full,
}

/// A folder with its subfolders and files resolved to full objects.
///
/// Built on demand from the id-keyed store; parents never embed children
/// persistently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulatedFolder {
    /// The folder itself.
    #[serde(flatten)]
    pub folder: Folder,
    /// Resolved subfolders, in the parent's `children` order.
    pub subfolders: Vec<PopulatedFolder>,
    /// Resolved files, in the parent's `files` order.
    #[serde(rename = "fileObjects")]
    pub file_objects: Vec<File>,
}

impl PopulatedFolder {
    /// Wrap a folder with nothing resolved yet.
    pub fn leaf(folder: Folder) -> Self {
        Self {
            folder,
            subfolders: Vec::new(),
            file_objects: Vec::new(),
        }
    }

    /// Total number of folders in this view, including itself.
    pub fn folder_count(&self) -> usize {
        1 + self
            .subfolders
            .iter()
            .map(PopulatedFolder::folder_count)
            .sum::<usize>()
    }
}
