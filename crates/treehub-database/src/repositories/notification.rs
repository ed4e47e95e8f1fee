//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use treehub_core::result::AppResult;
use treehub_entity::notification::{Notification, OwnerScope, ReadFilter};

use super::store_error;
use crate::store::NotificationStore;

/// PostgreSQL-backed notification log.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn append(&self, owner: &str, message: &str) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (owner, message) VALUES ($1, $2) RETURNING *",
        )
        .bind(owner)
        .bind(message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("Failed to append notification", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find notification", e))
    }

    async fn list(&self, scope: &OwnerScope, filter: ReadFilter) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE ($1::TEXT IS NULL OR owner = $1) AND ($2::BOOLEAN IS NULL OR read = $2) \
             ORDER BY read ASC, created_at DESC",
        )
        .bind(scope.owner())
        .bind(filter.read_value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to list notifications", e))
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to mark notification read", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, scope: &OwnerScope) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE \
             WHERE read = FALSE AND ($1::TEXT IS NULL OR owner = $1)",
        )
        .bind(scope.owner())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to mark notifications read", e))?;
        Ok(result.rows_affected())
    }
}
