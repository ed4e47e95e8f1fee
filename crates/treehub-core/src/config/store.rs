//! Store backend and notification settings.

use serde::{Deserialize, Serialize};

/// Which persistence engine backs the folder tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local maps. Contents are lost on exit.
    #[default]
    Memory,
    /// PostgreSQL through the `database` section.
    Postgres,
}

/// Store selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// The backend to connect.
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Notification listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Owner key whose listings span every tenant.
    #[serde(default = "default_super_owner")]
    pub super_owner: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            super_owner: default_super_owner(),
        }
    }
}

fn default_super_owner() -> String {
    "@admin".to_string()
}
