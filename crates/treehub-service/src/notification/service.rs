//! Appending, listing and marking notification records.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::events::DomainEvent;
use treehub_core::result::AppResult;
use treehub_database::NotificationStore;
use treehub_entity::notification::{Notification, OwnerScope, ReadFilter};

/// Durable notification log scoped by tenant owner.
#[derive(Clone)]
pub struct NotificationService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
    /// Owner key whose listings span every tenant.
    super_owner: String,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("super_owner", &self.super_owner)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, super_owner: impl Into<String>) -> Self {
        Self {
            store,
            super_owner: super_owner.into(),
        }
    }

    /// The scope a listing for `owner` covers.
    pub fn scope(&self, owner: &str) -> OwnerScope {
        if owner == self.super_owner {
            OwnerScope::All
        } else {
            OwnerScope::Owner(owner.to_string())
        }
    }

    /// Append an unread record.
    pub async fn append(&self, owner: &str, message: &str) -> AppResult<Notification> {
        let record = self.store.append(owner, message).await?;
        info!(
            notification_id = %record.id,
            owner = %record.owner,
            "Notification appended"
        );
        Ok(record)
    }

    /// Render and append a domain event.
    pub async fn record(&self, event: &DomainEvent) -> AppResult<Notification> {
        self.append(&event.owner, &event.message()).await
    }

    /// Append an event produced by a mutation that already succeeded.
    ///
    /// The tree change stands whether or not the record is written, so a
    /// store failure here is logged rather than returned.
    pub async fn record_after_mutation(&self, event: &DomainEvent) {
        if let Err(e) = self.record(event).await {
            warn!(
                event_id = %event.id,
                owner = %event.owner,
                error = %e,
                "Failed to append notification for completed mutation"
            );
        }
    }

    /// Every record for `owner`: unread first, newest first within each group.
    pub async fn list_all(&self, owner: &str) -> AppResult<Vec<Notification>> {
        self.store.list(&self.scope(owner), ReadFilter::All).await
    }

    /// Unread records for `owner`, newest first.
    pub async fn list_unread(&self, owner: &str) -> AppResult<Vec<Notification>> {
        self.store.list(&self.scope(owner), ReadFilter::Unread).await
    }

    /// Read records for `owner`, newest first.
    pub async fn list_read(&self, owner: &str) -> AppResult<Vec<Notification>> {
        self.store.list(&self.scope(owner), ReadFilter::Read).await
    }

    /// Records for `owner` matching `filter`.
    pub async fn list(&self, owner: &str, filter: ReadFilter) -> AppResult<Vec<Notification>> {
        self.store.list(&self.scope(owner), filter).await
    }

    /// Mark one record read.
    pub async fn mark_read(&self, notification_id: Uuid) -> AppResult<()> {
        if !self.store.mark_read(notification_id).await? {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }
        Ok(())
    }

    /// Mark every unread record of `owner` read. Returns how many changed.
    pub async fn mark_all_read(&self, owner: &str) -> AppResult<u64> {
        let changed = self.store.mark_all_read(&self.scope(owner)).await?;
        info!(owner = %owner, changed, "Notifications marked read");
        Ok(changed)
    }
}
