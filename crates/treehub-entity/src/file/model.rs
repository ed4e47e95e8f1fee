//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// File metadata. The bytes live in the blob store under `stored_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file name (including extension).
    pub name: String,
    /// Blob key. Immutable, and shared between a file and its copies.
    #[serde(alias = "hashedName")]
    pub stored_name: String,
    /// Containing folder's path followed by `name`.
    #[serde(rename = "path")]
    pub logical_path: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// Tenant key.
    pub owner: String,
    /// The folder containing this file.
    #[serde(rename = "folder")]
    pub folder_id: Uuid,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// Blob key.
    pub stored_name: String,
    /// Logical path.
    pub logical_path: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Tenant key.
    pub owner: String,
    /// The folder to place the file in.
    pub folder_id: Uuid,
}

/// Metadata for a file whose bytes were already written by the blob store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    /// The file name.
    pub name: String,
    /// Blob key assigned by the blob store.
    #[serde(alias = "hashedName")]
    pub stored_name: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME type.
    #[serde(alias = "type")]
    pub mime_type: Option<String>,
}

/// Field-level update applied to a single file record.
#[derive(Debug, Clone, Default)]
pub struct FilePatch {
    /// New name.
    pub name: Option<String>,
    /// New logical path.
    pub logical_path: Option<String>,
    /// New containing folder.
    pub folder_id: Option<Uuid>,
}

impl FilePatch {
    /// Apply the patch to an in-memory file.
    pub fn apply(&self, file: &mut File) {
        if let Some(name) = &self.name {
            file.name = name.clone();
        }
        if let Some(path) = &self.logical_path {
            file.logical_path = path.clone();
        }
        if let Some(folder_id) = self.folder_id {
            file.folder_id = folder_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_accepts_legacy_alias() {
        let json = r#"{"name":"a.pdf","hashedName":"1717826809517.pdf","size":3,"type":"application/pdf"}"#;
        let file: NewFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.stored_name, "1717826809517.pdf");
        assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
    }
}
