//! # treehub-core
//!
//! Core crate for TreeHub. Contains the unified error system, the
//! configuration schema, the materialized-path codec, and the tree events
//! that are rendered into notification messages.
//!
//! This crate has **no** internal dependencies on other TreeHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod path;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
