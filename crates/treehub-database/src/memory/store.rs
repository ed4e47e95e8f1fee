//! A process-local implementation of every store trait.
//!
//! Each trait method touches at most one record (plus the root-path
//! index), and each record mutation happens under that record's shard
//! lock, which mirrors the single-row atomicity of the SQL backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::result::AppResult;
use treehub_entity::file::{CreateFile, File, FilePatch};
use treehub_entity::folder::{CreateFolder, Folder, FolderPatch};
use treehub_entity::notification::{Notification, OwnerScope, ReadFilter};
use treehub_entity::permission::GrantSets;
use treehub_entity::user::DirectoryUser;

use crate::store::{FileStore, FolderStore, NotificationStore, UserDirectory};

#[derive(Debug, Clone)]
struct LogEntry {
    seq: u64,
    record: Notification,
}

/// In-memory store. Cloning shares the underlying maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    folders: Arc<DashMap<Uuid, Folder>>,
    root_paths: Arc<DashMap<String, Uuid>>,
    files: Arc<DashMap<Uuid, File>>,
    notifications: Arc<DashMap<Uuid, LogEntry>>,
    notification_seq: Arc<AtomicU64>,
    users: Arc<DashMap<String, DirectoryUser>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory user.
    pub fn add_user(&self, user: DirectoryUser) {
        self.users.insert(user.username.clone(), user);
    }

    /// Remove a directory user. Grants naming them are left untouched.
    pub fn remove_user(&self, username: &str) -> bool {
        self.users.remove(username).is_some()
    }

    /// Snapshot of every folder record, in no particular order.
    pub fn folders(&self) -> Vec<Folder> {
        self.folders.iter().map(|e| e.value().clone()).collect()
    }

    /// Snapshot of every file record, in no particular order.
    pub fn files(&self) -> Vec<File> {
        self.files.iter().map(|e| e.value().clone()).collect()
    }

    /// Claim `path` in the root index for `id`.
    fn claim_root_path(&self, path: &str, id: Uuid) -> AppResult<()> {
        match self.root_paths.entry(path.to_string()) {
            Entry::Occupied(existing) if *existing.get() != id => Err(AppError::duplicate_path(
                format!("Root path '{path}' already exists"),
            )),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn release_root_path(&self, path: &str, id: Uuid) {
        self.root_paths.remove_if(path, |_, owner| *owner == id);
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.folders.get(&id).map(|f| f.clone()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Folder>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.folders.get(id).map(|f| f.clone()))
            .collect())
    }

    async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        if let Some(id) = self.root_paths.get(path).map(|id| *id) {
            if let Some(folder) = self.folders.get(&id) {
                return Ok(Some(folder.clone()));
            }
        }
        Ok(self
            .folders
            .iter()
            .filter(|e| e.path == path)
            .map(|e| e.value().clone())
            .min_by_key(|f| f.created_at))
    }

    async fn find_roots(&self, owner: &str) -> AppResult<Vec<Folder>> {
        let mut roots: Vec<Folder> = self
            .folders
            .iter()
            .filter(|e| e.is_root() && e.owner == owner)
            .map(|e| e.value().clone())
            .collect();
        roots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roots)
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            path: data.path.clone(),
            owner: data.owner.clone(),
            parent_id: data.parent_id,
            children: Vec::new(),
            files: Vec::new(),
            grants: GrantSets::default(),
            created_at: now,
            updated_at: now,
        };
        if folder.is_root() {
            self.claim_root_path(&folder.path, folder.id)?;
        }
        self.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn update(&self, id: Uuid, patch: &FolderPatch) -> AppResult<Folder> {
        let mut entry = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        let mut next = entry.clone();
        patch.apply(&mut next);

        let was_root = entry.is_root();
        let old_path = entry.path.clone();
        if next.is_root() && (!was_root || next.path != old_path) {
            self.claim_root_path(&next.path, id)?;
        }
        if was_root && (!next.is_root() || next.path != old_path) {
            self.release_root_path(&old_path, id);
        }

        *entry = next;
        Ok(entry.clone())
    }

    async fn attach_child(&self, parent_id: Uuid, child_id: Uuid) -> AppResult<()> {
        let mut parent = self
            .folders
            .get_mut(&parent_id)
            .ok_or_else(|| AppError::not_found(format!("Folder {parent_id} not found")))?;
        if !parent.children.contains(&child_id) {
            parent.children.push(child_id);
            parent.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn detach_child(&self, parent_id: Uuid, child_id: Uuid) -> AppResult<bool> {
        let Some(mut parent) = self.folders.get_mut(&parent_id) else {
            return Ok(false);
        };
        parent.children.retain(|c| *c != child_id);
        parent.updated_at = Utc::now();
        Ok(true)
    }

    async fn attach_file(&self, folder_id: Uuid, file_id: Uuid) -> AppResult<()> {
        let mut folder = self
            .folders
            .get_mut(&folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        if !folder.files.contains(&file_id) {
            folder.files.push(file_id);
            folder.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn detach_file(&self, folder_id: Uuid, file_id: Uuid) -> AppResult<bool> {
        let Some(mut folder) = self.folders.get_mut(&folder_id) else {
            return Ok(false);
        };
        folder.files.retain(|f| *f != file_id);
        folder.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.folders.remove(&id) {
            Some((_, folder)) => {
                if folder.is_root() {
                    self.release_root_path(&folder.path, id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.files.get(&id).map(|f| f.clone()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<File>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.files.get(id).map(|f| f.clone()))
            .collect())
    }

    async fn search(&self, owner: &str, substring: &str) -> AppResult<Vec<File>> {
        let needle = substring.to_lowercase();
        let mut hits: Vec<File> = self
            .files
            .iter()
            .filter(|e| e.owner == owner && e.name.to_lowercase().contains(&needle))
            .map(|e| e.value().clone())
            .collect();
        hits.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(hits)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let file = File {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            stored_name: data.stored_name.clone(),
            logical_path: data.logical_path.clone(),
            size: data.size,
            mime_type: data.mime_type.clone(),
            owner: data.owner.clone(),
            folder_id: data.folder_id,
            created_at: Utc::now(),
        };
        self.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn update(&self, id: Uuid, patch: &FilePatch) -> AppResult<File> {
        let mut file = self
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        patch.apply(&mut file);
        Ok(file.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.files.remove(&id).is_some())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn append(&self, owner: &str, message: &str) -> AppResult<Notification> {
        let record = Notification {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            message: message.to_string(),
            read: false,
            created_at: Utc::now(),
        };
        let seq = self.notification_seq.fetch_add(1, Ordering::SeqCst);
        self.notifications.insert(
            record.id,
            LogEntry {
                seq,
                record: record.clone(),
            },
        );
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        Ok(self.notifications.get(&id).map(|e| e.record.clone()))
    }

    async fn list(&self, scope: &OwnerScope, filter: ReadFilter) -> AppResult<Vec<Notification>> {
        let wanted = filter.read_value();
        let mut entries: Vec<LogEntry> = self
            .notifications
            .iter()
            .filter(|e| scope.matches(&e.record.owner))
            .filter(|e| wanted.is_none_or(|read| e.record.read == read))
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by(|a, b| {
            a.record
                .read
                .cmp(&b.record.read)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        Ok(entries.into_iter().map(|e| e.record).collect())
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<bool> {
        match self.notifications.get_mut(&id) {
            Some(mut entry) => {
                entry.record.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, scope: &OwnerScope) -> AppResult<u64> {
        let mut changed = 0;
        for mut entry in self.notifications.iter_mut() {
            if !entry.record.read && scope.matches(&entry.record.owner) {
                entry.record.read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<DirectoryUser>> {
        Ok(self.users.get(username).map(|u| u.clone()))
    }
}
