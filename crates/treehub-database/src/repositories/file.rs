//! File repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::result::AppResult;
use treehub_entity::file::{CreateFile, File, FilePatch};

use super::store_error;
use crate::store::FileStore;

/// PostgreSQL-backed file metadata store.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find file", e))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<File>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to load files", e))?;

        let mut by_id: HashMap<Uuid, File> = rows.into_iter().map(|f| (f.id, f)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn search(&self, owner: &str, substring: &str) -> AppResult<Vec<File>> {
        // strpos treats the needle literally, so `%`, `_` and regex
        // metacharacters need no escaping.
        sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE owner = $1 AND strpos(lower(name), lower($2)) > 0 \
             ORDER BY lower(name) ASC, name ASC",
        )
        .bind(owner)
        .bind(substring)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to search files", e))
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (name, stored_name, logical_path, size, mime_type, owner, folder_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.stored_name)
        .bind(&data.logical_path)
        .bind(data.size)
        .bind(data.mime_type.as_deref())
        .bind(&data.owner)
        .bind(data.folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("Failed to create file", e))
    }

    async fn update(&self, id: Uuid, patch: &FilePatch) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET \
                name = COALESCE($2, name), \
                logical_path = COALESCE($3, logical_path), \
                folder_id = COALESCE($4, folder_id) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.logical_path.as_deref())
        .bind(patch.folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to update file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
