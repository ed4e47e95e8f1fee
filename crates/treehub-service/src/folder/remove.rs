//! Cascading delete of folders and files.

use std::collections::{HashSet, VecDeque};

use tracing::{info, warn};
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::events::{DomainEvent, TreeEvent};
use treehub_core::result::AppResult;
use treehub_entity::folder::Folder;

use super::service::{TreeService, mark};
use crate::batch::{BatchOutcome, NodeRef};
use crate::context::RequestContext;

impl TreeService {
    /// Deletes one folder (with its whole subtree) or one file.
    ///
    /// Returns the ids of every record removed.
    pub async fn delete(&self, ctx: &RequestContext, node: NodeRef) -> AppResult<Vec<Uuid>> {
        self.delete_many(ctx, &[node]).await?.into_single()
    }

    /// Deletes several nodes as one logical call.
    ///
    /// Items fail independently. One notification names every node that
    /// was fully removed.
    pub async fn delete_many(
        &self,
        ctx: &RequestContext,
        nodes: &[NodeRef],
    ) -> AppResult<BatchOutcome> {
        let _guard = self.lock_nodes(nodes, &[], &[]).await?;

        let mut outcome = BatchOutcome::default();
        let mut names = Vec::new();
        for node in nodes {
            match self.delete_locked(*node).await {
                Ok((name, removed)) => {
                    names.push(name);
                    outcome.record_success(removed);
                }
                Err(e) => {
                    warn!(node_id = %node.id, error = %e, "Batch delete item failed");
                    outcome.record_failure(*node, e);
                }
            }
        }

        info!(
            actor = %ctx.actor,
            succeeded = outcome.succeeded,
            failed = outcome.failures.len(),
            removed = outcome.affected.len(),
            "Batch delete finished"
        );

        if !names.is_empty() {
            let event = DomainEvent::new(
                ctx.actor.clone(),
                ctx.owner.clone(),
                TreeEvent::NodesDeleted { names },
            );
            self.notifications.record_after_mutation(&event).await;
        }
        Ok(outcome)
    }

    async fn delete_locked(&self, node: NodeRef) -> AppResult<(String, Vec<Uuid>)> {
        let mut removed = Vec::new();
        let (name, result) = if node.is_file {
            let file = self.get_file(node.id).await?;
            let result = self.delete_file(file.id, file.folder_id, &mut removed).await;
            (file.name, result)
        } else {
            let folder = self.get_folder(node.id).await?;
            let name = folder.name.clone();
            (name, self.delete_folder(folder, &mut removed).await)
        };
        match result {
            Ok(()) => Ok((name, removed)),
            Err(e) => Err(AppError::partial(e, removed)),
        }
    }

    async fn delete_file(
        &self,
        file_id: Uuid,
        folder_id: Uuid,
        removed: &mut Vec<Uuid>,
    ) -> AppResult<()> {
        self.stores.folders.detach_file(folder_id, file_id).await?;
        mark(removed, file_id);
        self.stores.files.delete(file_id).await?;
        Ok(())
    }

    /// Remove descendants post-order, then unlink the folder from its
    /// parent, then remove the folder itself.
    async fn delete_folder(&self, top: Folder, removed: &mut Vec<Uuid>) -> AppResult<()> {
        let subtree = self.collect_subtree(&top).await?;

        for folder in subtree.iter().rev() {
            for file_id in &folder.files {
                if self.stores.files.delete(*file_id).await? {
                    mark(removed, *file_id);
                }
            }
            if folder.id == top.id {
                if let Some(parent_id) = top.parent_id {
                    self.stores.folders.detach_child(parent_id, top.id).await?;
                }
            }
            if self.stores.folders.delete(folder.id).await? {
                mark(removed, folder.id);
            }
        }
        Ok(())
    }

    /// `top` and every folder below it, breadth first. A descendant always
    /// comes after its ancestors.
    async fn collect_subtree(&self, top: &Folder) -> AppResult<Vec<Folder>> {
        let mut order = Vec::new();
        let mut seen = HashSet::from([top.id]);
        let mut queue = VecDeque::from([top.clone()]);
        while let Some(folder) = queue.pop_front() {
            for child in self.stores.folders.find_by_ids(&folder.children).await? {
                if child.parent_id == Some(folder.id) && seen.insert(child.id) {
                    queue.push_back(child);
                }
            }
            order.push(folder);
        }
        Ok(order)
    }
}
