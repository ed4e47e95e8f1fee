//! User directory backed by the `users` table.

use async_trait::async_trait;
use sqlx::PgPool;

use treehub_core::result::AppResult;
use treehub_entity::user::DirectoryUser;

use super::store_error;
use crate::store::UserDirectory;

/// Read-only view of the account table maintained by the auth service.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<DirectoryUser>> {
        sqlx::query_as::<_, DirectoryUser>(
            "SELECT id, username, first_name, last_name, organization_name \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to find user", e))
    }
}
