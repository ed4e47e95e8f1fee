//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An append-only notification record scoped to a tenant owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The tenant key the record belongs to.
    pub owner: String,
    /// Rendered message.
    pub message: String,
    /// Whether the record has been read.
    pub read: bool,
    /// When the record was appended.
    pub created_at: DateTime<Utc>,
}

/// Which owners a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerScope {
    /// Every owner (the super-owner's view).
    All,
    /// Exactly one owner.
    Owner(String),
}

impl OwnerScope {
    /// Whether a record owned by `owner` falls in this scope.
    pub fn matches(&self, owner: &str) -> bool {
        match self {
            Self::All => true,
            Self::Owner(o) => o == owner,
        }
    }

    /// The owner to filter on, if any.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Owner(o) => Some(o),
        }
    }
}

/// Read-state filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFilter {
    /// Read and unread.
    All,
    /// Only read records.
    Read,
    /// Only unread records.
    Unread,
}

impl ReadFilter {
    /// The `read` value to filter on, if any.
    pub fn read_value(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Read => Some(true),
            Self::Unread => Some(false),
        }
    }
}
