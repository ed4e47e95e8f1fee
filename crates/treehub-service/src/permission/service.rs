//! Grant, revoke and query per-folder access levels.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::result::AppResult;
use treehub_database::Stores;
use treehub_entity::folder::{Folder, FolderPatch};
use treehub_entity::permission::{AccessLevel, GrantSets, Role};
use treehub_entity::user::Grantee;

use crate::context::RequestContext;
use crate::folder::SubtreeLocks;

/// Manages the three grant sets on each folder.
///
/// Every change reads all three sets, edits them as one value, and
/// writes them back in a single record update, so a user never lands in
/// two sets.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// Store capability.
    stores: Stores,
    /// Per-root mutation locks.
    locks: Arc<SubtreeLocks>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(stores: Stores, locks: Arc<SubtreeLocks>) -> Self {
        Self { stores, locks }
    }

    /// Gives `username` exactly `level` on a folder.
    pub async fn grant(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        username: &str,
        level: AccessLevel,
    ) -> AppResult<Folder> {
        self.grant_many(ctx, folder_id, &[username.to_string()], level)
            .await
    }

    /// Gives every user in `usernames` exactly `level` on a folder.
    ///
    /// All users are checked against the directory before anything is
    /// written.
    pub async fn grant_many(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        usernames: &[String],
        level: AccessLevel,
    ) -> AppResult<Folder> {
        for username in usernames {
            if self.stores.users.find_by_username(username).await?.is_none() {
                return Err(AppError::not_found(format!("User '{username}' not found")));
            }
        }

        let _guard = self
            .locks
            .lock_nodes(&self.stores, &[folder_id], &[], &[])
            .await?;
        let folder = self.require_folder(folder_id).await?;

        let mut grants = folder.grants.clone();
        let mut changed = false;
        for username in usernames {
            changed |= grants.assign(username, level);
        }
        if !changed {
            return Ok(folder);
        }

        let updated = self.write_grants(folder.id, grants).await?;
        info!(
            actor = %ctx.actor,
            folder_id = %folder_id,
            level = level.as_str(),
            users = usernames.len(),
            "Access granted"
        );
        Ok(updated)
    }

    /// Removes every grant `username` holds on a folder.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        username: &str,
    ) -> AppResult<Folder> {
        let _guard = self
            .locks
            .lock_nodes(&self.stores, &[folder_id], &[], &[])
            .await?;
        let folder = self.require_folder(folder_id).await?;

        let mut grants = folder.grants.clone();
        if !grants.remove(username) {
            return Ok(folder);
        }

        let updated = self.write_grants(folder.id, grants).await?;
        info!(
            actor = %ctx.actor,
            folder_id = %folder_id,
            username = %username,
            "Access revoked"
        );
        Ok(updated)
    }

    /// The level `username` holds on a folder, or [`Role::None`].
    pub async fn role_of(&self, folder_id: Uuid, username: &str) -> AppResult<Role> {
        let folder = self.require_folder(folder_id).await?;
        Ok(folder.grants.role_of(username))
    }

    /// Every grantee of a folder, resolved against the user directory.
    ///
    /// A grantee the directory no longer knows is still listed, with no
    /// names.
    pub async fn list_grantees(&self, folder_id: Uuid) -> AppResult<Vec<Grantee>> {
        let folder = self.require_folder(folder_id).await?;

        let mut grantees = Vec::new();
        for (username, role) in folder.grants.grantees() {
            let grantee = match self.stores.users.find_by_username(&username).await? {
                Some(user) => Grantee {
                    username,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    role,
                },
                None => {
                    warn!(
                        folder_id = %folder_id,
                        username = %username,
                        "Grantee missing from user directory"
                    );
                    Grantee {
                        username,
                        first_name: None,
                        last_name: None,
                        role,
                    }
                }
            };
            grantees.push(grantee);
        }
        Ok(grantees)
    }

    async fn require_folder(&self, folder_id: Uuid) -> AppResult<Folder> {
        self.stores
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    async fn write_grants(
        &self,
        folder_id: Uuid,
        grants: GrantSets,
    ) -> AppResult<Folder> {
        if !grants.is_disjoint() {
            return Err(AppError::invalid_operation(format!(
                "Grant sets of folder {folder_id} would overlap"
            )));
        }
        let patch = FolderPatch {
            grants: Some(grants),
            ..FolderPatch::default()
        };
        self.stores.folders.update(folder_id, &patch).await
    }
}
