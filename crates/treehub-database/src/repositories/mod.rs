//! PostgreSQL implementations of the store traits.

pub mod file;
pub mod folder;
pub mod notification;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;

use treehub_core::error::{AppError, ErrorKind};

/// Unique index guarding root paths.
pub(crate) const ROOT_PATH_CONSTRAINT: &str = "folders_root_path_key";

/// Classify a sqlx error.
///
/// Connectivity problems become `StoreUnavailable` so callers know a retry
/// may succeed; anything else is an internal error with the cause kept.
pub(crate) fn store_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::WorkerCrashed => ErrorKind::StoreUnavailable,
        _ => ErrorKind::Internal,
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_retryable() {
        let err = store_error("Failed to find folder", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_row_not_found_is_internal() {
        let err = store_error("Failed to update folder", sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
