pub mod chat_page;

pub use chat_page::ChatPage;
