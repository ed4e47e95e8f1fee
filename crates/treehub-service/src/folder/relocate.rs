//! Move and copy of folders and files.

use std::collections::VecDeque;

use tracing::{debug, info, warn};
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::path;
use treehub_core::result::AppResult;
use treehub_entity::file::{CreateFile, File, FilePatch};
use treehub_entity::folder::{CreateFolder, Folder, FolderPatch};

use super::service::{TreeService, mark};
use crate::batch::{BatchOutcome, NodeRef};
use crate::context::RequestContext;

/// A finished copy: the new top-level node and every record created.
#[derive(Debug, Clone)]
pub(crate) struct CopyReport {
    /// Id of the copy of the requested node.
    pub(crate) root: Uuid,
    /// Every folder and file created, top-down.
    pub(crate) created: Vec<Uuid>,
}

/// A record written by an in-flight copy, with the folder it was
/// attached to.
#[derive(Debug, Clone, Copy)]
struct CreatedNode {
    node: NodeRef,
    parent_id: Uuid,
}

impl TreeService {
    /// Moves a folder or file from `old_parent_id` to `new_parent_id`.
    ///
    /// Returns the ids of every node written. A node whose parent is
    /// already `new_parent_id` is accepted, so re-running an interrupted
    /// move finishes it.
    pub async fn move_node(
        &self,
        ctx: &RequestContext,
        node: NodeRef,
        new_parent_id: Uuid,
        old_parent_id: Uuid,
    ) -> AppResult<Vec<Uuid>> {
        let _guard = self
            .lock_nodes(&[node], &[new_parent_id, old_parent_id], &[])
            .await?;
        let new_parent = self.get_folder(new_parent_id).await?;
        self.get_folder(old_parent_id).await?;

        let affected = self.move_locked(node, &new_parent, old_parent_id).await?;
        info!(
            actor = %ctx.actor,
            node_id = %node.id,
            is_file = node.is_file,
            new_parent_id = %new_parent_id,
            rewritten = affected.len(),
            "Node moved"
        );
        Ok(affected)
    }

    /// Moves several nodes that share a parent. Items fail independently.
    pub async fn move_many(
        &self,
        ctx: &RequestContext,
        nodes: &[NodeRef],
        new_parent_id: Uuid,
        old_parent_id: Uuid,
    ) -> AppResult<BatchOutcome> {
        let _guard = self
            .lock_nodes(nodes, &[new_parent_id, old_parent_id], &[])
            .await?;
        let new_parent = self.get_folder(new_parent_id).await?;
        self.get_folder(old_parent_id).await?;

        let mut outcome = BatchOutcome::default();
        for node in nodes {
            match self.move_locked(*node, &new_parent, old_parent_id).await {
                Ok(ids) => outcome.record_success(ids),
                Err(e) => {
                    warn!(node_id = %node.id, error = %e, "Batch move item failed");
                    outcome.record_failure(*node, e);
                }
            }
        }

        info!(
            actor = %ctx.actor,
            new_parent_id = %new_parent_id,
            succeeded = outcome.succeeded,
            failed = outcome.failures.len(),
            "Batch move finished"
        );
        Ok(outcome)
    }

    /// Copies a folder (deeply) or a file into `dest_id`.
    ///
    /// Returns the id of the copy, or `None` when the source is the
    /// destination itself, which is skipped.
    pub async fn copy_node(
        &self,
        ctx: &RequestContext,
        node: NodeRef,
        dest_id: Uuid,
    ) -> AppResult<Option<Uuid>> {
        if !node.is_file && node.id == dest_id {
            debug!(folder_id = %node.id, "Copy into itself skipped");
            return Ok(None);
        }
        let _guard = self.lock_nodes(&[node], &[dest_id], &[]).await?;
        let dest = self.get_folder(dest_id).await?;

        let report = self.copy_locked(node, &dest).await?;
        info!(
            actor = %ctx.actor,
            source_id = %node.id,
            copy_id = %report.root,
            dest_id = %dest_id,
            created = report.created.len(),
            "Node copied"
        );
        Ok(Some(report.root))
    }

    /// Copies several nodes into `dest_id`, skipping the destination
    /// itself if it is listed. Items fail independently.
    pub async fn copy_many(
        &self,
        ctx: &RequestContext,
        nodes: &[NodeRef],
        dest_id: Uuid,
    ) -> AppResult<BatchOutcome> {
        let _guard = self.lock_nodes(nodes, &[dest_id], &[]).await?;
        let dest = self.get_folder(dest_id).await?;

        let mut outcome = BatchOutcome::default();
        for node in nodes {
            if !node.is_file && node.id == dest_id {
                debug!(folder_id = %node.id, "Destination listed in its own copy batch, skipped");
                continue;
            }
            match self.copy_locked(*node, &dest).await {
                Ok(report) => outcome.record_success(report.created),
                Err(e) => {
                    warn!(node_id = %node.id, error = %e, "Batch copy item failed");
                    outcome.record_failure(*node, e);
                }
            }
        }

        info!(
            actor = %ctx.actor,
            dest_id = %dest_id,
            succeeded = outcome.succeeded,
            failed = outcome.failures.len(),
            "Batch copy finished"
        );
        Ok(outcome)
    }

    async fn move_locked(
        &self,
        node: NodeRef,
        new_parent: &Folder,
        old_parent_id: Uuid,
    ) -> AppResult<Vec<Uuid>> {
        let mut completed = Vec::new();
        let result = if node.is_file {
            let file = self.get_file(node.id).await?;
            self.move_file(&file, new_parent, old_parent_id, &mut completed)
                .await
        } else {
            let folder = self.get_folder(node.id).await?;
            self.move_folder(&folder, new_parent, old_parent_id, &mut completed)
                .await
        };
        match result {
            Ok(()) => Ok(completed),
            Err(e) => Err(AppError::partial(e, completed)),
        }
    }

    async fn move_file(
        &self,
        file: &File,
        new_parent: &Folder,
        old_parent_id: Uuid,
        completed: &mut Vec<Uuid>,
    ) -> AppResult<()> {
        if file.folder_id != old_parent_id && file.folder_id != new_parent.id {
            return Err(AppError::invalid_operation(format!(
                "File {} is not in folder {old_parent_id}",
                file.id
            )));
        }

        self.stores.folders.attach_file(new_parent.id, file.id).await?;
        mark(completed, file.id);

        let expected = path::file_path(&new_parent.path, &file.name);
        if file.folder_id != new_parent.id || file.logical_path != expected {
            let patch = FilePatch {
                folder_id: Some(new_parent.id),
                logical_path: Some(expected),
                ..FilePatch::default()
            };
            self.stores.files.update(file.id, &patch).await?;
        }

        if old_parent_id != new_parent.id {
            self.stores.folders.detach_file(old_parent_id, file.id).await?;
        }
        Ok(())
    }

    async fn move_folder(
        &self,
        folder: &Folder,
        new_parent: &Folder,
        old_parent_id: Uuid,
        completed: &mut Vec<Uuid>,
    ) -> AppResult<()> {
        let Some(current_parent) = folder.parent_id else {
            return Err(AppError::invalid_operation(format!(
                "Root folder {} cannot be moved",
                folder.id
            )));
        };
        if current_parent != old_parent_id && current_parent != new_parent.id {
            return Err(AppError::invalid_operation(format!(
                "Folder {} is not in folder {old_parent_id}",
                folder.id
            )));
        }
        self.ensure_outside(folder.id, new_parent).await?;

        let new_path = path::derive(&new_parent.path, &folder.name)?;
        if current_parent != new_parent.id || folder.path != new_path {
            let patch = FolderPatch {
                path: Some(new_path.clone()),
                parent_id: Some(Some(new_parent.id)),
                ..FolderPatch::default()
            };
            self.stores.folders.update(folder.id, &patch).await?;
            mark(completed, folder.id);
        }

        self.stores
            .folders
            .attach_child(new_parent.id, folder.id)
            .await?;
        mark(completed, folder.id);

        if old_parent_id != new_parent.id {
            self.stores
                .folders
                .detach_child(old_parent_id, folder.id)
                .await?;
        }

        self.rewrite_descendants(folder.id, &folder.path, &new_path, completed)
            .await
    }

    async fn copy_locked(&self, node: NodeRef, dest: &Folder) -> AppResult<CopyReport> {
        let mut created = Vec::new();
        let result = if node.is_file {
            match self.get_file(node.id).await {
                Ok(file) => self.copy_file_into(&file, dest, &mut created).await,
                Err(e) => Err(e),
            }
        } else {
            self.copy_folder_into(node.id, dest, &mut created).await
        };
        match result {
            Ok(root) => Ok(CopyReport {
                root,
                created: created.iter().map(|entry| entry.node.id).collect(),
            }),
            Err(e) => Err(self.undo_copy(e, created).await),
        }
    }

    /// Removes the records of a failed copy, newest first, so a retry
    /// starts from a clean destination.
    ///
    /// Returns `cause` when everything was removed, otherwise a partial
    /// failure naming the records still present.
    async fn undo_copy(&self, cause: AppError, mut created: Vec<CreatedNode>) -> AppError {
        while let Some(entry) = created.last().copied() {
            if let Err(e) = self.remove_created(entry).await {
                warn!(
                    node_id = %entry.node.id,
                    remaining = created.len(),
                    error = %e,
                    "Failed to undo partial copy"
                );
                let left = created.iter().map(|entry| entry.node.id).collect();
                return AppError::partial(cause, left);
            }
            created.pop();
        }
        debug!(error = %cause, "Partial copy undone");
        cause
    }

    async fn remove_created(&self, entry: CreatedNode) -> AppResult<()> {
        if entry.node.is_file {
            self.stores
                .folders
                .detach_file(entry.parent_id, entry.node.id)
                .await?;
            self.stores.files.delete(entry.node.id).await?;
        } else {
            self.stores
                .folders
                .detach_child(entry.parent_id, entry.node.id)
                .await?;
            self.stores.folders.delete(entry.node.id).await?;
        }
        Ok(())
    }

    /// Clone file metadata into `dest`. The blob key is shared.
    async fn copy_file_into(
        &self,
        file: &File,
        dest: &Folder,
        created: &mut Vec<CreatedNode>,
    ) -> AppResult<Uuid> {
        let copy = self
            .stores
            .files
            .create(&CreateFile {
                name: file.name.clone(),
                stored_name: file.stored_name.clone(),
                logical_path: path::file_path(&dest.path, &file.name),
                size: file.size,
                mime_type: file.mime_type.clone(),
                owner: file.owner.clone(),
                folder_id: dest.id,
            })
            .await?;
        created.push(CreatedNode {
            node: NodeRef::file(copy.id),
            parent_id: dest.id,
        });
        self.stores.folders.attach_file(dest.id, copy.id).await?;
        Ok(copy.id)
    }

    /// Clone the subtree at `source_id` under `dest`, breadth first.
    /// Grants are not copied.
    async fn copy_folder_into(
        &self,
        source_id: Uuid,
        dest: &Folder,
        created: &mut Vec<CreatedNode>,
    ) -> AppResult<Uuid> {
        let source = self.get_folder(source_id).await?;
        self.ensure_outside(source.id, dest).await?;

        let mut top = None;
        let mut queue = VecDeque::from([(source, dest.id, dest.path.clone())]);
        while let Some((original, parent_id, parent_path)) = queue.pop_front() {
            let copy = self
                .stores
                .folders
                .create(&CreateFolder {
                    name: original.name.clone(),
                    path: path::derive(&parent_path, &original.name)?,
                    owner: original.owner.clone(),
                    parent_id: Some(parent_id),
                })
                .await?;
            created.push(CreatedNode {
                node: NodeRef::folder(copy.id),
                parent_id,
            });
            self.stores.folders.attach_child(parent_id, copy.id).await?;
            top.get_or_insert(copy.id);

            for file in self.stores.files.find_by_ids(&original.files).await? {
                self.copy_file_into(&file, &copy, created).await?;
            }
            for child in self.stores.folders.find_by_ids(&original.children).await? {
                if child.parent_id == Some(original.id) {
                    queue.push_back((child, copy.id, copy.path.clone()));
                }
            }
        }

        top.ok_or_else(|| AppError::internal("Copy produced no folder"))
    }
}
