pub mod notification_models;
pub mod notification_service;

pub use notification_models::{Notice, Severity};
pub use notification_service::{BroadcastSink, NotificationSink, TracingSink};
