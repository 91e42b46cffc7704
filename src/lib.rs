pub mod attachment;
pub mod auth;
pub mod chat;
pub mod conversation;
pub mod error;
pub mod message;
pub mod notification;
pub mod seed;
pub mod state;

pub use chat::ChatPage;
pub use error::{AppError, Result};
pub use seed::ChatSeed;
pub use state::{AppState, Config};
