//! Request context carrying the verified caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current authenticated request.
///
/// The transport layer builds this after authentication and passes it
/// into every mutating call so that log lines and notification records
/// know *who* acted and *which* tenant the action belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The username of the caller.
    pub actor: String,
    /// The tenant key notifications are scoped to.
    pub owner: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            owner: owner.into(),
            request_time: Utc::now(),
        }
    }
}
