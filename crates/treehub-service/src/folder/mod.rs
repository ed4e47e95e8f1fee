//! The tree engine.

pub mod lock;
pub mod relocate;
pub mod remove;
pub mod service;
pub mod tree;

pub use lock::{SubtreeGuard, SubtreeLocks};
pub use service::TreeService;
