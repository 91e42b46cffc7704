pub mod message_dto;
pub mod message_models;
pub mod message_repository;
pub mod message_service;

pub use message_dto::{send_enabled, Draft};
pub use message_models::{Direction, Message, MessageStatus};
pub use message_repository::MessageStore;
pub use message_service::{timestamp_label, ContentStore, MessageService, SessionContentStore};
