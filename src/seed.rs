use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attachment::{is_allowed_mime, AttachmentKind, MAX_ATTACHMENT_BYTES};
use crate::conversation::{Conversation, ConversationId};
use crate::error::{AppError, Result};
use crate::message::{Direction, Message, MessageStatus};

/// Initial conversations and their threads, injected at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSeed {
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub threads: HashMap<ConversationId, Vec<Message>>,
}

impl ChatSeed {
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: ChatSeed = serde_json::from_str(json)?;
        seed.check()?;
        Ok(seed)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read seed {}: {}", path.display(), e))
        })?;
        tracing::info!("Loading chat seed from {}", path.display());
        Self::from_json(&json)
    }

    /// Rejects fixtures that break the model's invariants.
    fn check(&self) -> Result<()> {
        for (index, conversation) in self.conversations.iter().enumerate() {
            if self.conversations[..index]
                .iter()
                .any(|other| other.id == conversation.id)
            {
                return Err(AppError::Validation(format!(
                    "Duplicate conversation id {}",
                    conversation.id
                )));
            }
        }

        for (conversation_id, messages) in &self.threads {
            if !self.conversations.iter().any(|c| &c.id == conversation_id) {
                return Err(AppError::NotFound(format!(
                    "Thread for unknown conversation {}",
                    conversation_id
                )));
            }
            for (index, message) in messages.iter().enumerate() {
                if messages[..index].iter().any(|other| other.id == message.id) {
                    return Err(AppError::Validation(format!(
                        "Duplicate message id {} in conversation {}",
                        message.id, conversation_id
                    )));
                }
                if message.text.trim().is_empty() && message.attachments.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Message {} in conversation {} is empty",
                        message.id, conversation_id
                    )));
                }
                for attachment in &message.attachments {
                    if !is_allowed_mime(&attachment.mime_type) {
                        return Err(AppError::Validation(format!(
                            "Attachment {} has unsupported type {}",
                            attachment.name, attachment.mime_type
                        )));
                    }
                    if attachment.size > MAX_ATTACHMENT_BYTES {
                        return Err(AppError::Validation(format!(
                            "Attachment {} exceeds the size limit",
                            attachment.name
                        )));
                    }
                    if attachment.kind != AttachmentKind::from_mime(&attachment.mime_type) {
                        return Err(AppError::Validation(format!(
                            "Attachment {} is tagged {} but has type {}",
                            attachment.name, attachment.kind, attachment.mime_type
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Demo fixture: five conversations, one of which has history.
    pub fn demo() -> Self {
        fn conversation(
            id: &str,
            name: &str,
            last_message: &str,
            timestamp: &str,
            unread_count: Option<u32>,
            is_online: bool,
        ) -> Conversation {
            Conversation {
                id: id.into(),
                name: name.to_string(),
                last_message: last_message.to_string(),
                timestamp: timestamp.to_string(),
                avatar: None,
                unread_count,
                is_online: Some(is_online),
            }
        }

        fn message(id: &str, text: &str, timestamp: &str, direction: Direction) -> Message {
            Message {
                id: id.to_string(),
                text: text.to_string(),
                timestamp: timestamp.to_string(),
                direction,
                status: Some(MessageStatus::Read),
                attachments: Vec::new(),
            }
        }

        let conversations = vec![
            conversation("1", "Alice Johnson", "Hey! How are you doing?", "2:30 PM", Some(2), true),
            conversation("2", "Bob Smith", "Thanks for the help yesterday!", "1:15 PM", None, false),
            conversation("3", "Carol Davis", "See you at the meeting tomorrow", "12:45 PM", Some(1), true),
            conversation("4", "David Wilson", "The project looks great so far", "Yesterday", None, false),
            conversation("5", "Emma Brown", "Can we reschedule our call?", "Yesterday", Some(3), true),
        ];

        let mut threads = HashMap::new();
        threads.insert(
            ConversationId::from("1"),
            vec![
                message("1", "Hey! How are you doing?", "2:30 PM", Direction::Counterparty),
                message("2", "I am doing great, thanks! How about you?", "2:32 PM", Direction::Own),
                message("3", "Pretty good! Working on some exciting projects", "2:33 PM", Direction::Counterparty),
            ],
        );

        Self {
            conversations,
            threads,
        }
    }
}
