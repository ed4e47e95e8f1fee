//! Folder repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::result::AppResult;
use treehub_entity::folder::{CreateFolder, Folder, FolderPatch};
use treehub_entity::permission::AccessLevel;

use super::{ROOT_PATH_CONSTRAINT, store_error};
use crate::store::FolderStore;

/// PostgreSQL-backed folder store.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find folder", e))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Folder>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to load folders", e))?;

        let mut by_id: HashMap<Uuid, Folder> = rows.into_iter().map(|f| (f.id, f)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE path = $1 ORDER BY (parent_id IS NULL) DESC, created_at ASC LIMIT 1",
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to find folder by path", e))
    }

    async fn find_roots(&self, owner: &str) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id IS NULL AND owner = $1 ORDER BY name ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to list root folders", e))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, path, owner, parent_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.path)
        .bind(&data.owner)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(ROOT_PATH_CONSTRAINT) =>
            {
                AppError::duplicate_path(format!("Root path '{}' already exists", data.path))
            }
            _ => store_error("Failed to create folder", e),
        })
    }

    async fn update(&self, id: Uuid, patch: &FolderPatch) -> AppResult<Folder> {
        let grants = patch.grants.as_ref();
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET \
                name = COALESCE($2, name), \
                path = COALESCE($3, path), \
                parent_id = CASE WHEN $4 THEN $5 ELSE parent_id END, \
                read_grants = COALESCE($6, read_grants), \
                write_grants = COALESCE($7, write_grants), \
                read_write_grants = COALESCE($8, read_write_grants), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.path.as_deref())
        .bind(patch.parent_id.is_some())
        .bind(patch.parent_id.flatten())
        .bind(grants.map(|g| g.column(AccessLevel::Read)))
        .bind(grants.map(|g| g.column(AccessLevel::Write)))
        .bind(grants.map(|g| g.column(AccessLevel::ReadWrite)))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(ROOT_PATH_CONSTRAINT) =>
            {
                AppError::duplicate_path("Root path already exists")
            }
            _ => store_error("Failed to update folder", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn attach_child(&self, parent_id: Uuid, child_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE folders SET \
                children = CASE WHEN $2 = ANY(children) THEN children ELSE array_append(children, $2) END, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(parent_id)
        .bind(child_id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to attach child folder", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Folder {parent_id} not found")));
        }
        Ok(())
    }

    async fn detach_child(&self, parent_id: Uuid, child_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE folders SET children = array_remove(children, $2), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(parent_id)
        .bind(child_id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to detach child folder", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn attach_file(&self, folder_id: Uuid, file_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE folders SET \
                files = CASE WHEN $2 = ANY(files) THEN files ELSE array_append(files, $2) END, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(folder_id)
        .bind(file_id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to attach file", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        Ok(())
    }

    async fn detach_file(&self, folder_id: Uuid, file_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE folders SET files = array_remove(files, $2), updated_at = NOW() WHERE id = $1",
        )
        .bind(folder_id)
        .bind(file_id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to detach file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete folder", e))?;
        Ok(result.rows_affected() > 0)
    }
}
