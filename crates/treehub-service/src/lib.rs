//! # treehub-service
//!
//! The tree engine and the services around it. Each service receives the
//! store capability ([`Stores`](treehub_database::Stores)) at
//! construction and never reaches a database handle any other way.
//!
//! Structural mutations on the same root are serialized through a shared
//! [`SubtreeLocks`] table; recursive operations are not atomic and report
//! what they completed through `PartialFailure`.

pub mod batch;
pub mod context;
pub mod file;
pub mod folder;
pub mod notification;
pub mod permission;
pub mod services;

pub use batch::{BatchFailure, BatchOutcome, NodeRef};
pub use context::RequestContext;
pub use file::{FileService, SearchService};
pub use folder::{SubtreeLocks, TreeService};
pub use notification::NotificationService;
pub use permission::AccessService;
pub use services::Services;
