//! The bundle of store handles the engine is constructed with.

use std::sync::Arc;

use treehub_core::config::{AppConfig, StoreBackend};
use treehub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::repositories::{
    FileRepository, FolderRepository, NotificationRepository, UserRepository,
};
use crate::store::{FileStore, FolderStore, NotificationStore, UserDirectory};

/// Shared handles to every store capability.
#[derive(Clone)]
pub struct Stores {
    /// Folder records.
    pub folders: Arc<dyn FolderStore>,
    /// File metadata records.
    pub files: Arc<dyn FileStore>,
    /// The notification log.
    pub notifications: Arc<dyn NotificationStore>,
    /// The user directory.
    pub users: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

impl Stores {
    /// Build PostgreSQL-backed stores over an existing pool.
    pub fn postgres(pool: &DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            folders: Arc::new(FolderRepository::new(pg.clone())),
            files: Arc::new(FileRepository::new(pg.clone())),
            notifications: Arc::new(NotificationRepository::new(pg.clone())),
            users: Arc::new(UserRepository::new(pg)),
        }
    }

    /// Build stores that all share one in-memory backend.
    #[cfg(feature = "memory")]
    pub fn memory(store: crate::memory::MemoryStore) -> Self {
        Self {
            folders: Arc::new(store.clone()),
            files: Arc::new(store.clone()),
            notifications: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }

    /// Connect the backend selected in configuration.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        match config.store.backend {
            StoreBackend::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                pool.ensure_schema().await?;
                Ok(Self::postgres(&pool))
            }
            #[cfg(feature = "memory")]
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store; contents are discarded on exit");
                Ok(Self::memory(crate::memory::MemoryStore::new()))
            }
            #[cfg(not(feature = "memory"))]
            StoreBackend::Memory => Err(treehub_core::error::AppError::configuration(
                "The memory backend is not compiled in",
            )),
        }
    }
}
