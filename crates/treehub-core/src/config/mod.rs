//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a default so a missing file still yields
//! a usable memory-backed setup.

pub mod database;
pub mod logging;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::store::{NotificationConfig, StoreBackend, StoreConfig};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store backend selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Database connection settings (used by the postgres backend).
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Notification settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional. Environment variables prefixed with
    /// `TREEHUB__` override it (`TREEHUB__STORE__BACKEND=postgres`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TREEHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("does/not/exist.toml").expect("defaults");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.notifications.super_owner, "@admin");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.max_connections, 20);
    }

    #[test]
    fn test_backend_parses_lowercase() {
        let cfg: StoreConfig = serde_json::from_str(r#"{"backend":"postgres"}"#).unwrap();
        assert_eq!(cfg.backend, StoreBackend::Postgres);
    }
}
