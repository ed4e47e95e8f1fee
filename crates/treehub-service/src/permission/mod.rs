//! Per-folder access grants.

pub mod service;

pub use service::AccessService;
