//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use treehub_core::config::AppConfig;
use treehub_core::error::AppError;
use treehub_core::path;
use treehub_core::result::AppResult;
use treehub_database::{FileStore, FolderStore, MemoryStore, Stores};
use treehub_entity::file::{CreateFile, File, FilePatch, NewFile};
use treehub_entity::folder::{CreateFolder, Folder, FolderPatch};
use treehub_entity::user::DirectoryUser;
use treehub_service::{RequestContext, Services};

/// Services over a memory store whose folder and file writes can be
/// made to fail after a budget.
pub struct Harness {
    pub memory: MemoryStore,
    pub faults: FaultyStore,
    pub services: Services,
}

impl Harness {
    pub fn new() -> Self {
        let memory = MemoryStore::new();
        let faults = FaultyStore::new(memory.clone());
        let stores = Stores {
            folders: Arc::new(faults.clone()),
            files: Arc::new(faults.clone()),
            notifications: Arc::new(memory.clone()),
            users: Arc::new(memory.clone()),
        };
        let services = Services::new(stores, &AppConfig::default());
        Self {
            memory,
            faults,
            services,
        }
    }

    pub fn add_user(&self, username: &str, organization: Option<&str>) {
        self.memory.add_user(user(username, organization));
    }

    pub async fn root(&self, name: &str) -> Folder {
        self.services
            .tree
            .create_root(&ctx(), name, "acme")
            .await
            .unwrap()
    }

    pub async fn folder(&self, parent: &Folder, name: &str) -> Folder {
        self.services
            .tree
            .create_subfolder(&ctx(), parent.id, name, "acme")
            .await
            .unwrap()
    }

    pub async fn file(&self, folder: &Folder, name: &str) -> File {
        self.services
            .files
            .register_files(&ctx(), folder.id, vec![upload(name)])
            .await
            .unwrap()
            .remove(0)
    }

    pub async fn reload(&self, folder: &Folder) -> Folder {
        self.services.tree.get_folder(folder.id).await.unwrap()
    }

    pub async fn reload_file(&self, file: &File) -> File {
        self.services.files.get_file(file.id).await.unwrap()
    }
}

pub fn ctx() -> RequestContext {
    RequestContext::new("alice", "acme")
}

pub fn user(username: &str, organization: Option<&str>) -> DirectoryUser {
    DirectoryUser {
        id: Uuid::new_v4(),
        username: username.to_string(),
        first_name: Some(format!("{username}-first")),
        last_name: Some(format!("{username}-last")),
        organization_name: organization.map(str::to_string),
    }
}

pub fn upload(name: &str) -> NewFile {
    NewFile {
        name: name.to_string(),
        stored_name: format!("blob-{name}"),
        size: 42,
        mime_type: Some("text/plain".to_string()),
    }
}

/// Check every structural invariant over the whole memory store.
pub fn assert_consistent(memory: &MemoryStore) {
    let folders: HashMap<Uuid, Folder> =
        memory.folders().into_iter().map(|f| (f.id, f)).collect();

    for folder in folders.values() {
        match folder.parent_id {
            None => assert_eq!(folder.path, path::root(&folder.name).unwrap()),
            Some(parent_id) => {
                let parent = folders
                    .get(&parent_id)
                    .unwrap_or_else(|| panic!("{} has a missing parent", folder.path));
                assert_eq!(
                    folder.path,
                    path::derive(&parent.path, &folder.name).unwrap(),
                    "path of {} does not follow its parent",
                    folder.id
                );
                assert!(
                    parent.children.contains(&folder.id),
                    "{} is not listed by its parent",
                    folder.path
                );
            }
        }
        for child in &folder.children {
            let child = folders
                .get(child)
                .unwrap_or_else(|| panic!("{} lists a missing child", folder.path));
            assert_eq!(child.parent_id, Some(folder.id));
        }
        assert!(folder.grants.is_disjoint());
    }

    for file in memory.files() {
        let folder = folders
            .get(&file.folder_id)
            .unwrap_or_else(|| panic!("{} has no folder", file.name));
        assert!(folder.files.contains(&file.id));
        assert_eq!(file.logical_path, path::file_path(&folder.path, &file.name));
    }
}

/// Wraps a memory store and fails folder and file writes once a write
/// budget is spent.
#[derive(Clone)]
pub struct FaultyStore {
    inner: MemoryStore,
    budget: Arc<AtomicI64>,
    once: Arc<AtomicBool>,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            budget: Arc::new(AtomicI64::new(-1)),
            once: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Allow `writes` more writes, then fail every write.
    pub fn fail_after(&self, writes: i64) {
        self.once.store(false, Ordering::SeqCst);
        self.budget.store(writes, Ordering::SeqCst);
    }

    /// Allow `writes` more writes, fail the next one, then recover.
    pub fn fail_once_after(&self, writes: i64) {
        self.once.store(true, Ordering::SeqCst);
        self.budget.store(writes, Ordering::SeqCst);
    }

    /// Allow every write again.
    pub fn heal(&self) {
        self.once.store(false, Ordering::SeqCst);
        self.budget.store(-1, Ordering::SeqCst);
    }

    fn spend(&self) -> AppResult<()> {
        let result = self
            .budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                -1 => Some(-1),
                0 => None,
                n => Some(n - 1),
            });
        match result {
            Ok(_) => Ok(()),
            Err(_) => {
                if self.once.swap(false, Ordering::SeqCst) {
                    self.budget.store(-1, Ordering::SeqCst);
                }
                Err(AppError::store_unavailable("injected store outage"))
            }
        }
    }
}

#[async_trait]
impl FolderStore for FaultyStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        FolderStore::find_by_id(&self.inner, id).await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Folder>> {
        FolderStore::find_by_ids(&self.inner, ids).await
    }

    async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        self.inner.find_by_path(path).await
    }

    async fn find_roots(&self, owner: &str) -> AppResult<Vec<Folder>> {
        self.inner.find_roots(owner).await
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.spend()?;
        FolderStore::create(&self.inner, data).await
    }

    async fn update(&self, id: Uuid, patch: &FolderPatch) -> AppResult<Folder> {
        self.spend()?;
        FolderStore::update(&self.inner, id, patch).await
    }

    async fn attach_child(&self, parent_id: Uuid, child_id: Uuid) -> AppResult<()> {
        self.spend()?;
        self.inner.attach_child(parent_id, child_id).await
    }

    async fn detach_child(&self, parent_id: Uuid, child_id: Uuid) -> AppResult<bool> {
        self.spend()?;
        self.inner.detach_child(parent_id, child_id).await
    }

    async fn attach_file(&self, folder_id: Uuid, file_id: Uuid) -> AppResult<()> {
        self.spend()?;
        self.inner.attach_file(folder_id, file_id).await
    }

    async fn detach_file(&self, folder_id: Uuid, file_id: Uuid) -> AppResult<bool> {
        self.spend()?;
        self.inner.detach_file(folder_id, file_id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.spend()?;
        FolderStore::delete(&self.inner, id).await
    }
}

#[async_trait]
impl FileStore for FaultyStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        FileStore::find_by_id(&self.inner, id).await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<File>> {
        FileStore::find_by_ids(&self.inner, ids).await
    }

    async fn search(&self, owner: &str, substring: &str) -> AppResult<Vec<File>> {
        self.inner.search(owner, substring).await
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        self.spend()?;
        FileStore::create(&self.inner, data).await
    }

    async fn update(&self, id: Uuid, patch: &FilePatch) -> AppResult<File> {
        self.spend()?;
        FileStore::update(&self.inner, id, patch).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.spend()?;
        FileStore::delete(&self.inner, id).await
    }
}
