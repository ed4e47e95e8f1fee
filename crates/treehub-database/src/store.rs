//! The store capability.
//!
//! The tree engine receives these traits at construction and never
//! reaches a database handle any other way. Point lookups return
//! `Ok(None)` for absent records; the engine decides whether that is a
//! `NotFound`. Transient backend failures surface as `StoreUnavailable`.

use async_trait::async_trait;
use uuid::Uuid;

use treehub_core::result::AppResult;
use treehub_entity::file::{CreateFile, File, FilePatch};
use treehub_entity::folder::{CreateFolder, Folder, FolderPatch};
use treehub_entity::notification::{Notification, OwnerScope, ReadFilter};
use treehub_entity::user::DirectoryUser;

/// Persistence for folder records.
#[async_trait]
pub trait FolderStore: Send + Sync + 'static {
    /// Find a folder by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Find folders by ID, in input order. Missing IDs are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Folder>>;

    /// Find a folder by its materialized path.
    async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>>;

    /// List root folders of an owner, sorted by name.
    async fn find_roots(&self, owner: &str) -> AppResult<Vec<Folder>>;

    /// Create a folder with no children, no files, and empty grants.
    ///
    /// Fails with `DuplicatePath` when a root with the same path exists.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Apply a patch in one record write. Fails with `NotFound`.
    async fn update(&self, id: Uuid, patch: &FolderPatch) -> AppResult<Folder>;

    /// Append `child_id` to `children` unless present. Fails with `NotFound`.
    async fn attach_child(&self, parent_id: Uuid, child_id: Uuid) -> AppResult<()>;

    /// Remove `child_id` from `children`. Returns `false` if the parent is gone.
    async fn detach_child(&self, parent_id: Uuid, child_id: Uuid) -> AppResult<bool>;

    /// Append `file_id` to `files` unless present. Fails with `NotFound`.
    async fn attach_file(&self, folder_id: Uuid, file_id: Uuid) -> AppResult<()>;

    /// Remove `file_id` from `files`. Returns `false` if the folder is gone.
    async fn detach_file(&self, folder_id: Uuid, file_id: Uuid) -> AppResult<bool>;

    /// Delete a single folder record. Returns `true` if it existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Persistence for file metadata records.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Find a file by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Find files by ID, in input order. Missing IDs are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<File>>;

    /// Case-insensitive literal substring match on `name` within one owner,
    /// ordered case-insensitively by name.
    async fn search(&self, owner: &str, substring: &str) -> AppResult<Vec<File>>;

    /// Create a file record.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Apply a patch in one record write. Fails with `NotFound`.
    async fn update(&self, id: Uuid, patch: &FilePatch) -> AppResult<File>;

    /// Delete a file record. Returns `true` if it existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Append-only notification log.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Append an unread record.
    async fn append(&self, owner: &str, message: &str) -> AppResult<Notification>;

    /// Find a record by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>>;

    /// List records: unread before read, newest first within each group.
    async fn list(&self, scope: &OwnerScope, filter: ReadFilter) -> AppResult<Vec<Notification>>;

    /// Mark one record read. Returns `false` if it does not exist.
    async fn mark_read(&self, id: Uuid) -> AppResult<bool>;

    /// Mark every unread record in scope read. Returns how many changed.
    async fn mark_all_read(&self, scope: &OwnerScope) -> AppResult<u64>;
}

/// The external user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Look a user up by login name.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<DirectoryUser>>;
}
