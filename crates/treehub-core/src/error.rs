//! Unified application error types for TreeHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Transport layers decide how each
//! [`ErrorKind`] is presented; the engine only classifies.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A referenced folder, file, notification, or user is absent.
    NotFound,
    /// A node name is empty or contains the path separator.
    InvalidName,
    /// A root folder with the same path already exists.
    DuplicatePath,
    /// The operation would break the tree shape or the grant invariants.
    InvalidOperation,
    /// Malformed input that is not a node name (bad level, bad id).
    Validation,
    /// The backing store is temporarily unreachable. Callers may retry.
    StoreUnavailable,
    /// A recursive operation stopped mid-way. See [`AppError::completed`].
    PartialFailure,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InvalidName => write!(f, "INVALID_NAME"),
            Self::DuplicatePath => write!(f, "DUPLICATE_PATH"),
            Self::InvalidOperation => write!(f, "INVALID_OPERATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::PartialFailure => write!(f, "PARTIAL_FAILURE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout TreeHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Node ids written before a recursive operation stopped.
    ///
    /// Only populated for [`ErrorKind::PartialFailure`].
    pub completed: Vec<Uuid>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            completed: Vec::new(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            completed: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an invalid-name error.
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName, message)
    }

    /// Create a duplicate-path error.
    pub fn duplicate_path(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicatePath, message)
    }

    /// Create an invalid-operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Wrap the error that stopped a recursive operation.
    ///
    /// With nothing completed the tree is untouched and the cause is
    /// returned as-is, so callers only see `PartialFailure` when a retry
    /// actually has state to reconcile.
    pub fn partial(cause: AppError, completed: Vec<Uuid>) -> Self {
        if completed.is_empty() {
            return cause;
        }
        Self {
            kind: ErrorKind::PartialFailure,
            message: format!(
                "stopped after {} node(s): {}",
                completed.len(),
                cause.message
            ),
            completed,
            source: Some(Box::new(cause)),
        }
    }

    /// Whether the caller sent something the engine refuses.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NotFound
                | ErrorKind::InvalidName
                | ErrorKind::DuplicatePath
                | ErrorKind::InvalidOperation
                | ErrorKind::Validation
        )
    }

    /// Whether re-issuing the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::StoreUnavailable | ErrorKind::PartialFailure
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            completed: self.completed.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::StoreUnavailable, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_without_progress_keeps_cause() {
        let err = AppError::partial(AppError::store_unavailable("down"), Vec::new());
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(err.completed.is_empty());
    }

    #[test]
    fn test_partial_carries_completed_ids() {
        let done = vec![Uuid::new_v4(), Uuid::new_v4()];
        let err = AppError::partial(AppError::store_unavailable("down"), done.clone());
        assert_eq!(err.kind, ErrorKind::PartialFailure);
        assert_eq!(err.completed, done);
        assert!(err.message.contains("down"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classification() {
        assert!(AppError::not_found("x").is_client_error());
        assert!(AppError::invalid_operation("x").is_client_error());
        assert!(!AppError::store_unavailable("x").is_client_error());
        assert!(AppError::store_unavailable("x").is_retryable());
        assert!(!AppError::duplicate_path("x").is_retryable());
    }

    #[test]
    fn test_display() {
        let err = AppError::invalid_name("Folder name cannot be empty");
        assert_eq!(err.to_string(), "INVALID_NAME: Folder name cannot be empty");
    }
}
