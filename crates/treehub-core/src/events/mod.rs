//! Domain events emitted by auditable tree mutations.
//!
//! The engine only decides *that* an event happened; each event is
//! rendered into a human-readable message once, at append time, and
//! stored as a notification record scoped to the tenant owner.

pub mod tree;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use tree::TreeEvent;

/// Wrapper for tree events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The username that caused the event.
    pub actor: String,
    /// The tenant the resulting notification is scoped to.
    pub owner: String,
    /// The event payload.
    pub event: TreeEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor: impl Into<String>, owner: impl Into<String>, event: TreeEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor: actor.into(),
            owner: owner.into(),
            event,
        }
    }

    /// The rendered notification message.
    pub fn message(&self) -> String {
        self.event.render(&self.actor)
    }
}
