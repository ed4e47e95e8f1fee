//! Every service wired over one set of stores.

use std::sync::Arc;

use treehub_core::config::AppConfig;
use treehub_database::Stores;

use crate::file::{FileService, SearchService};
use crate::folder::{SubtreeLocks, TreeService};
use crate::notification::NotificationService;
use crate::permission::AccessService;

/// The service layer, sharing one store bundle and one lock table.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct Services {
    /// The tree engine.
    pub tree: Arc<TreeService>,
    /// File metadata.
    pub files: Arc<FileService>,
    /// Name search.
    pub search: Arc<SearchService>,
    /// Access grants.
    pub access: Arc<AccessService>,
    /// Notification log.
    pub notifications: Arc<NotificationService>,
    /// The per-root lock table every service above serializes on.
    pub locks: Arc<SubtreeLocks>,
}

impl Services {
    /// Wire every service over `stores`.
    pub fn new(stores: Stores, config: &AppConfig) -> Self {
        let locks = Arc::new(SubtreeLocks::new());
        let notifications = NotificationService::new(
            Arc::clone(&stores.notifications),
            config.notifications.super_owner.clone(),
        );

        Self {
            tree: Arc::new(TreeService::new(
                stores.clone(),
                Arc::clone(&locks),
                notifications.clone(),
            )),
            files: Arc::new(FileService::new(
                stores.clone(),
                Arc::clone(&locks),
                notifications.clone(),
            )),
            search: Arc::new(SearchService::new(Arc::clone(&stores.files))),
            access: Arc::new(AccessService::new(stores, Arc::clone(&locks))),
            notifications: Arc::new(notifications),
            locks,
        }
    }
}
