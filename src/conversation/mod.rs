pub mod conversation_models;
pub mod conversation_service;

pub use conversation_models::{Conversation, ConversationId};
pub use conversation_service::ConversationSelector;
