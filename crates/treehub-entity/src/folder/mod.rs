//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, Folder, FolderPatch};
pub use tree::{PopulateDepth, PopulatedFolder};
