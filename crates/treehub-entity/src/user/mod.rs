//! Users as seen through the external directory.

pub mod model;

pub use model::{DirectoryUser, Grantee};
