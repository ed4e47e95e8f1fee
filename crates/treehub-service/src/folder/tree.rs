//! Read-only hydration of folders for presentation.

use std::collections::{HashMap, VecDeque};

use uuid::Uuid;

use treehub_core::result::AppResult;
use treehub_entity::file::File;
use treehub_entity::folder::{Folder, PopulateDepth, PopulatedFolder};

use super::service::TreeService;

impl TreeService {
    /// Resolves a folder's subfolders and files into full objects.
    ///
    /// With [`PopulateDepth::Immediate`] the subfolders are returned
    /// unresolved; with [`PopulateDepth::Full`] the whole subtree is.
    pub async fn populate(
        &self,
        folder_id: Uuid,
        depth: PopulateDepth,
    ) -> AppResult<PopulatedFolder> {
        let root = self.get_folder(folder_id).await?;

        if depth == PopulateDepth::Immediate {
            let subfolders = self
                .stores
                .folders
                .find_by_ids(&root.children)
                .await?
                .into_iter()
                .map(PopulatedFolder::leaf)
                .collect();
            let file_objects = self.stores.files.find_by_ids(&root.files).await?;
            return Ok(PopulatedFolder {
                folder: root,
                subfolders,
                file_objects,
            });
        }

        let mut folders: HashMap<Uuid, Folder> = HashMap::new();
        let mut files: HashMap<Uuid, Vec<File>> = HashMap::new();
        let mut queue = VecDeque::from([root.clone()]);
        while let Some(folder) = queue.pop_front() {
            if folders.contains_key(&folder.id) {
                continue;
            }
            files.insert(folder.id, self.stores.files.find_by_ids(&folder.files).await?);
            for child in self.stores.folders.find_by_ids(&folder.children).await? {
                if !folders.contains_key(&child.id) {
                    queue.push_back(child);
                }
            }
            folders.insert(folder.id, folder);
        }

        let root_id = root.id;
        Ok(assemble(root_id, &mut folders, &mut files)
            .unwrap_or_else(|| PopulatedFolder::leaf(root)))
    }
}

/// Build the nested view. Each folder is taken out of the map once, so a
/// corrupted child list cannot loop.
fn assemble(
    id: Uuid,
    folders: &mut HashMap<Uuid, Folder>,
    files: &mut HashMap<Uuid, Vec<File>>,
) -> Option<PopulatedFolder> {
    let folder = folders.remove(&id)?;
    let file_objects = files.remove(&id).unwrap_or_default();
    let subfolders = folder
        .children
        .iter()
        .filter_map(|child| assemble(*child, folders, files))
        .collect();
    Some(PopulatedFolder {
        folder,
        subfolders,
        file_objects,
    })
}
