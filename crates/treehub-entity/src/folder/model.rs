//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::permission::GrantSets;

/// A folder in the tree.
///
/// `path` is materialized: it always equals the parent's path plus
/// `name` and a trailing slash, and only the tree engine writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Full materialized path (e.g., `/acme/reports/`).
    pub path: String,
    /// Tenant key. May be empty for non-root folders.
    pub owner: String,
    /// Parent folder ID (None for root folders).
    #[serde(rename = "parent")]
    pub parent_id: Option<Uuid>,
    /// Child folder IDs, in attach order.
    pub children: Vec<Uuid>,
    /// IDs of files in this folder.
    pub files: Vec<Uuid>,
    /// The three pairwise-disjoint grant sets.
    #[serde(flatten)]
    pub grants: GrantSets,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl<'r> FromRow<'r, PgRow> for Folder {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            path: row.try_get("path")?,
            owner: row.try_get("owner")?,
            parent_id: row.try_get("parent_id")?,
            children: row.try_get("children")?,
            files: row.try_get("files")?,
            grants: GrantSets::from_columns(
                row.try_get("read_grants")?,
                row.try_get("write_grants")?,
                row.try_get("read_write_grants")?,
            ),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Data required to create a new folder.
///
/// New folders always start with no children, no files, and empty grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Full materialized path.
    pub path: String,
    /// Tenant key.
    pub owner: String,
    /// Parent folder (None for root).
    pub parent_id: Option<Uuid>,
}

/// Field-level update applied to a single folder record in one write.
///
/// `children` and `files` are not part of the patch; they change through
/// the store's attach/detach operations so that concurrent appends never
/// overwrite each other.
#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    /// New name.
    pub name: Option<String>,
    /// New materialized path.
    pub path: Option<String>,
    /// New parent reference (`Some(None)` detaches to a root).
    pub parent_id: Option<Option<Uuid>>,
    /// Replacement for all three grant sets together.
    pub grants: Option<GrantSets>,
}

impl FolderPatch {
    /// A patch that only rewrites the path.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Apply the patch to an in-memory folder.
    pub fn apply(&self, folder: &mut Folder) {
        if let Some(name) = &self.name {
            folder.name = name.clone();
        }
        if let Some(path) = &self.path {
            folder.path = path.clone();
        }
        if let Some(parent_id) = self.parent_id {
            folder.parent_id = parent_id;
        }
        if let Some(grants) = &self.grants {
            folder.grants = grants.clone();
        }
        folder.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Folder {
        Folder {
            id: Uuid::new_v4(),
            name: "A".into(),
            path: "/Root/A/".into(),
            owner: "acme".into(),
            parent_id: Some(Uuid::new_v4()),
            children: Vec::new(),
            files: Vec::new(),
            grants: GrantSets::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_moves_to_root() {
        let mut folder = sample();
        let patch = FolderPatch {
            parent_id: Some(None),
            path: Some("/A/".into()),
            ..FolderPatch::default()
        };
        patch.apply(&mut folder);
        assert!(folder.is_root());
        assert_eq!(folder.path, "/A/");
        assert_eq!(folder.name, "A");
    }

    #[test]
    fn test_json_contract_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("path").is_some());
        assert!(json.get("read").is_some());
        assert!(json.get("write").is_some());
        assert!(json.get("readWrite").is_some());
        assert!(json.get("owner").is_some());
        assert!(json.get("parent").is_some());
    }
}
