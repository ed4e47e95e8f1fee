//! The event sink and the notification reader.

pub mod service;

pub use service::NotificationService;
