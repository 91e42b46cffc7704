use tracing::debug;

use super::conversation_models::{Conversation, ConversationId};

/// Tracks which conversation of a fixed list is active.
#[derive(Debug, Clone, Default)]
pub struct ConversationSelector {
    conversations: Vec<Conversation>,
    active: Option<usize>,
}

impl ConversationSelector {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            active: None,
        }
    }

    /// Unknown ids leave the current selection in place.
    pub fn select(&mut self, id: &ConversationId) -> Option<&Conversation> {
        match self.conversations.iter().position(|c| &c.id == id) {
            Some(index) => {
                self.active = Some(index);
                debug!("Selected conversation {}", id);
                self.conversations.get(index)
            }
            None => {
                debug!("Ignoring selection of unknown conversation {}", id);
                None
            }
        }
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active.and_then(|index| self.conversations.get(index))
    }

    pub fn active_id(&self) -> Option<&ConversationId> {
        self.active().map(|c| &c.id)
    }

    pub fn is_selected(&self, id: &ConversationId) -> bool {
        self.active_id() == Some(id)
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }
}
