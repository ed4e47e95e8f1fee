//! # treehub-entity
//!
//! Domain entity models for TreeHub. Every struct in this crate
//! represents a database table row or a domain value object. Serde field
//! names follow the JSON contract consumed by transport layers (`path`,
//! `readWrite`, `storedName`, ...); database rows additionally implement
//! `sqlx::FromRow`.

pub mod file;
pub mod folder;
pub mod notification;
pub mod permission;
pub mod user;
