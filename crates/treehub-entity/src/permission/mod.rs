//! Per-folder access grants.

pub mod grant;
pub mod level;

pub use grant::GrantSets;
pub use level::{AccessLevel, Role};
