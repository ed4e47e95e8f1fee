//! # treehub-database
//!
//! The store capability consumed by the tree engine, expressed as async
//! traits, together with a PostgreSQL implementation (sqlx) and an
//! in-memory implementation for tests and single-process use.
//!
//! Nothing here enforces tree invariants; the stores only promise that
//! each individual record write is atomic.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use store::{FileStore, FolderStore, NotificationStore, UserDirectory};
pub use stores::Stores;
