//! Directory user model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permission::Role;

/// A user as returned by the external user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    /// Directory identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Organization the user registered, if any.
    pub organization_name: Option<String>,
}

impl DirectoryUser {
    /// Whether the user registered an organization and therefore owns a root.
    pub fn has_organization(&self) -> bool {
        self.organization_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

/// A grantee on a folder, resolved against the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grantee {
    /// Login name.
    pub username: String,
    /// Given name (None when the user is no longer in the directory).
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// The level the user holds on the folder.
    pub role: Role,
}
