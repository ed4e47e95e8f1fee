//! Folder creation, lookup and rename, plus the subtree path rewrite
//! shared by rename and move.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use treehub_core::error::{AppError, ErrorKind};
use treehub_core::events::{DomainEvent, TreeEvent};
use treehub_core::path;
use treehub_core::result::AppResult;
use treehub_database::Stores;
use treehub_entity::file::{File, FilePatch};
use treehub_entity::folder::{CreateFolder, Folder, FolderPatch};
use treehub_entity::user::DirectoryUser;

use super::lock::{SubtreeGuard, SubtreeLocks};
use crate::batch::NodeRef;
use crate::context::RequestContext;
use crate::notification::NotificationService;

/// The tree engine: create, rename, move, copy, delete and populate.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Store capability.
    pub(crate) stores: Stores,
    /// Per-root mutation locks, shared with the other services.
    pub(crate) locks: Arc<SubtreeLocks>,
    /// Event sink for auditable mutations.
    pub(crate) notifications: NotificationService,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(
        stores: Stores,
        locks: Arc<SubtreeLocks>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            stores,
            locks,
            notifications,
        }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: Uuid) -> AppResult<Folder> {
        self.stores
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Gets a folder by its materialized path.
    pub async fn get_folder_by_path(&self, folder_path: &str) -> AppResult<Folder> {
        self.stores
            .folders
            .find_by_path(folder_path)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No folder at '{folder_path}'")))
    }

    /// Lists the root folders of an owner, sorted by name.
    pub async fn list_roots(&self, owner: &str) -> AppResult<Vec<Folder>> {
        self.stores.folders.find_roots(owner).await
    }

    pub(crate) async fn get_file(&self, file_id: Uuid) -> AppResult<File> {
        self.stores
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Creates a root folder at `/name/`.
    pub async fn create_root(
        &self,
        ctx: &RequestContext,
        name: &str,
        owner: &str,
    ) -> AppResult<Folder> {
        let root_path = path::root(name)?;
        let _guard = self.locks.acquire([name.to_string()].into()).await;

        if let Some(existing) = self.stores.folders.find_by_path(&root_path).await? {
            if existing.is_root() {
                return Err(AppError::duplicate_path(format!(
                    "Root path '{root_path}' already exists"
                )));
            }
        }

        let folder = self
            .stores
            .folders
            .create(&CreateFolder {
                name: name.to_string(),
                path: root_path,
                owner: owner.to_string(),
                parent_id: None,
            })
            .await?;

        info!(
            actor = %ctx.actor,
            folder_id = %folder.id,
            path = %folder.path,
            owner = %folder.owner,
            "Root folder created"
        );
        Ok(folder)
    }

    /// Creates a folder under `parent_id`.
    pub async fn create_subfolder(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        name: &str,
        owner: &str,
    ) -> AppResult<Folder> {
        path::validate_name(name)?;
        let _guard = self.lock_nodes(&[], &[parent_id], &[]).await?;

        let parent = self.get_folder(parent_id).await?;
        let folder_path = path::derive(&parent.path, name)?;

        let folder = self
            .stores
            .folders
            .create(&CreateFolder {
                name: name.to_string(),
                path: folder_path,
                owner: owner.to_string(),
                parent_id: Some(parent.id),
            })
            .await?;

        if let Err(e) = self.stores.folders.attach_child(parent.id, folder.id).await {
            // Without the link the new record is unreachable; take it back.
            return match self.stores.folders.delete(folder.id).await {
                Ok(_) => Err(e),
                Err(_) => Err(AppError::partial(e, vec![folder.id])),
            };
        }

        info!(
            actor = %ctx.actor,
            folder_id = %folder.id,
            parent_id = %parent.id,
            path = %folder.path,
            "Folder created"
        );
        Ok(folder)
    }

    /// Gives a newly registered user their root folder.
    ///
    /// Only users who registered an organization own a root; it is named
    /// after, and owned by, their username. Provisioning twice returns
    /// the existing root.
    pub async fn provision_root(
        &self,
        ctx: &RequestContext,
        user: &DirectoryUser,
    ) -> AppResult<Option<Folder>> {
        if !user.has_organization() {
            debug!(username = %user.username, "User has no organization, no root provisioned");
            return Ok(None);
        }

        match self.create_root(ctx, &user.username, &user.username).await {
            Ok(folder) => Ok(Some(folder)),
            Err(e) if e.kind == ErrorKind::DuplicatePath => {
                let existing = self.get_folder_by_path(&path::root(&user.username)?).await?;
                if existing.owner != user.username {
                    return Err(e);
                }
                Ok(Some(existing))
            }
            Err(e) => Err(e),
        }
    }

    /// Renames a folder and rewrites the paths of its whole subtree.
    ///
    /// Renaming to the current name is a no-op on the folder itself but
    /// still repairs descendants left stale by an interrupted attempt.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        path::validate_name(new_name)?;
        let before = self.get_folder(folder_id).await?;
        let extra = if before.is_root() {
            vec![new_name.to_string()]
        } else {
            Vec::new()
        };
        let _guard = self.lock_nodes(&[], &[folder_id], &extra).await?;

        let folder = self.get_folder(folder_id).await?;
        let old_name = folder.name.clone();
        let old_path = folder.path.clone();
        let new_path = path::rename_segment(&old_path, &old_name, new_name)?;

        let mut completed = Vec::new();
        let renamed = if old_name != new_name || old_path != new_path {
            let patch = FolderPatch {
                name: Some(new_name.to_string()),
                path: Some(new_path.clone()),
                ..FolderPatch::default()
            };
            let updated = self.stores.folders.update(folder.id, &patch).await?;
            completed.push(folder.id);
            updated
        } else {
            folder
        };

        // The name change is visible once the folder record is written,
        // even if the subtree rewrite below stops early. A retry that only
        // repairs descendants is not announced again.
        if old_name != new_name {
            let event = DomainEvent::new(
                ctx.actor.clone(),
                ctx.owner.clone(),
                TreeEvent::FolderRenamed {
                    folder_id: renamed.id,
                    old_name,
                    new_name: new_name.to_string(),
                },
            );
            self.notifications.record_after_mutation(&event).await;
        }

        if let Err(e) = self
            .rewrite_descendants(renamed.id, &old_path, &new_path, &mut completed)
            .await
        {
            return Err(AppError::partial(e, completed));
        }

        if completed.is_empty() {
            debug!(folder_id = %folder_id, "Rename changed nothing");
            return Ok(renamed);
        }

        info!(
            actor = %ctx.actor,
            folder_id = %renamed.id,
            old_path = %old_path,
            new_path = %new_path,
            rewritten = completed.len(),
            "Folder renamed"
        );
        Ok(renamed)
    }

    /// Rewrite every descendant path of the folder whose path changed
    /// from `old_path` to `new_path`.
    ///
    /// Each descendant's new path is its stored path with the parent's
    /// old prefix swapped for the parent's new one. A descendant whose
    /// stored path does not carry that prefix is stale from an earlier
    /// interrupted rewrite and is re-derived from its parent instead.
    /// Records that are already correct are not written.
    pub(crate) async fn rewrite_descendants(
        &self,
        folder_id: Uuid,
        old_path: &str,
        new_path: &str,
        completed: &mut Vec<Uuid>,
    ) -> AppResult<()> {
        let mut queue = VecDeque::from([(folder_id, old_path.to_string(), new_path.to_string())]);
        let mut visited = HashSet::new();

        while let Some((id, old_prefix, new_prefix)) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(folder) = self.stores.folders.find_by_id(id).await? else {
                continue;
            };

            for file in self.stores.files.find_by_ids(&folder.files).await? {
                let expected = path::replace_prefix(&file.logical_path, &old_prefix, &new_prefix)
                    .unwrap_or_else(|| path::file_path(&new_prefix, &file.name));
                if expected != file.logical_path {
                    let patch = FilePatch {
                        logical_path: Some(expected),
                        ..FilePatch::default()
                    };
                    self.stores.files.update(file.id, &patch).await?;
                    completed.push(file.id);
                }
            }

            for child in self.stores.folders.find_by_ids(&folder.children).await? {
                if child.parent_id != Some(folder.id) {
                    warn!(
                        folder_id = %folder.id,
                        child_id = %child.id,
                        "Child listed under a folder it does not point back to, skipped"
                    );
                    continue;
                }
                let expected = match path::replace_prefix(&child.path, &old_prefix, &new_prefix) {
                    Some(p) => p,
                    None => path::derive(&new_prefix, &child.name)?,
                };
                if expected != child.path {
                    self.stores
                        .folders
                        .update(child.id, &FolderPatch::path(expected.clone()))
                        .await?;
                    completed.push(child.id);
                }
                debug!(folder_id = %child.id, path = %expected, "Descendant path checked");
                queue.push_back((child.id, child.path, expected));
            }
        }
        Ok(())
    }

    /// Fail with `InvalidOperation` if `candidate` is `node_id` or lies
    /// below it, by walking parent references upward.
    pub(crate) async fn ensure_outside(&self, node_id: Uuid, candidate: &Folder) -> AppResult<()> {
        let mut seen = HashSet::new();
        let mut current = Some(candidate.clone());
        while let Some(folder) = current {
            if folder.id == node_id {
                return Err(AppError::invalid_operation(format!(
                    "Folder {node_id} cannot be placed inside its own subtree"
                )));
            }
            if !seen.insert(folder.id) {
                break;
            }
            current = match folder.parent_id {
                Some(parent_id) => self.stores.folders.find_by_id(parent_id).await?,
                None => None,
            };
        }
        Ok(())
    }

    /// Lock the roots of `nodes`, `folders`, and the `extra` root names.
    pub(crate) async fn lock_nodes(
        &self,
        nodes: &[NodeRef],
        folders: &[Uuid],
        extra: &[String],
    ) -> AppResult<SubtreeGuard> {
        let mut folder_ids: Vec<Uuid> = folders.to_vec();
        let mut file_ids = Vec::new();
        for node in nodes {
            if node.is_file {
                file_ids.push(node.id);
            } else {
                folder_ids.push(node.id);
            }
        }
        self.locks
            .lock_nodes(&self.stores, &folder_ids, &file_ids, extra)
            .await
    }
}

/// Record `id` as written, once.
pub(crate) fn mark(completed: &mut Vec<Uuid>, id: Uuid) {
    if !completed.contains(&id) {
        completed.push(id);
    }
}
