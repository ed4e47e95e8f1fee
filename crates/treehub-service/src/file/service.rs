//! File lookup, bulk upload registration and rename.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::events::{DomainEvent, TreeEvent};
use treehub_core::path;
use treehub_core::result::AppResult;
use treehub_database::Stores;
use treehub_entity::file::{CreateFile, File, FilePatch, NewFile};

use crate::context::RequestContext;
use crate::folder::SubtreeLocks;
use crate::notification::NotificationService;

/// Manages file metadata. Bytes are written by the blob store before
/// registration and never touched here.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Store capability.
    stores: Stores,
    /// Per-root mutation locks.
    locks: Arc<SubtreeLocks>,
    /// Event sink for uploads.
    notifications: NotificationService,
}

impl FileService {
    /// Creates a new file service.
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

    /// Gets a file by ID.
    pub async fn get_file(&self, file_id: Uuid) -> AppResult<File> {
        self.stores
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Registers uploaded files in a folder and emits one notification
    /// naming them all.
    ///
    /// Every name is validated before the first write.
    pub async fn register_files(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        uploads: Vec<NewFile>,
    ) -> AppResult<Vec<File>> {
        for upload in &uploads {
            path::validate_name(&upload.name)?;
            if upload.size < 0 {
                return Err(AppError::validation(format!(
                    "File '{}' has a negative size",
                    upload.name
                )));
            }
        }
        if uploads.is_empty() {
            return Ok(Vec::new());
        }

        let _guard = self
            .locks
            .lock_nodes(&self.stores, &[folder_id], &[], &[])
            .await?;
        let folder = self
            .stores
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

        let mut created = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let data = CreateFile {
                logical_path: path::file_path(&folder.path, &upload.name),
                name: upload.name,
                stored_name: upload.stored_name,
                size: upload.size,
                mime_type: upload.mime_type,
                owner: ctx.owner.clone(),
                folder_id: folder.id,
            };
            let file = match self.stores.files.create(&data).await {
                Ok(file) => file,
                Err(e) => return Err(AppError::partial(e, ids(&created))),
            };
            let attached = self.stores.folders.attach_file(folder.id, file.id).await;
            created.push(file);
            if let Err(e) = attached {
                return Err(AppError::partial(e, ids(&created)));
            }
        }

        info!(
            actor = %ctx.actor,
            folder_id = %folder.id,
            count = created.len(),
            "Files registered"
        );

        let event = DomainEvent::new(
            ctx.actor.clone(),
            ctx.owner.clone(),
            TreeEvent::FilesUploaded {
                folder_id: folder.id,
                folder_path: folder.path.clone(),
                names: created.iter().map(|f| f.name.clone()).collect(),
            },
        );
        self.notifications.record_after_mutation(&event).await;

        Ok(created)
    }

    /// Renames a file. The blob key is unchanged.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_name: &str,
    ) -> AppResult<File> {
        path::validate_name(new_name)?;
        let _guard = self
            .locks
            .lock_nodes(&self.stores, &[], &[file_id], &[])
            .await?;

        let file = self.get_file(file_id).await?;
        let folder = self
            .stores
            .folders
            .find_by_id(file.folder_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Folder {} of file {file_id} not found", file.folder_id))
            })?;

        let logical_path = path::file_path(&folder.path, new_name);
        if file.name == new_name && file.logical_path == logical_path {
            return Ok(file);
        }

        let patch = FilePatch {
            name: Some(new_name.to_string()),
            logical_path: Some(logical_path),
            ..FilePatch::default()
        };
        let renamed = self.stores.files.update(file.id, &patch).await?;

        info!(
            actor = %ctx.actor,
            file_id = %file.id,
            old_name = %file.name,
            new_name = %renamed.name,
            "File renamed"
        );
        Ok(renamed)
    }
}

fn ids(files: &[File]) -> Vec<Uuid> {
    files.iter().map(|f| f.id).collect()
}
