use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::attachment::{Attachment, ContentRef, PendingFile, RawFile};
use crate::conversation::ConversationId;
use crate::error::{AppError, Result};
use crate::message::message_dto::Draft;
use crate::message::message_models::{Direction, Message, MessageStatus};
use crate::message::message_repository::MessageStore;

/// Resolves a picked file to a content reference at send time. A durable
/// uploader plugs in here.
pub trait ContentStore: Send + Sync {
    fn store(&self, file: &RawFile) -> Result<ContentRef>;
}

/// Keeps files in the browser session: a reference the picker already
/// provided is reused, otherwise a temporary one is minted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionContentStore;

impl ContentStore for SessionContentStore {
    fn store(&self, file: &RawFile) -> Result<ContentRef> {
        Ok(file
            .content_ref
            .clone()
            .unwrap_or_else(ContentRef::session_local))
    }
}

pub fn timestamp_label(now: &DateTime<Local>) -> String {
    now.format("%H:%M").to_string()
}

#[derive(Clone)]
pub struct MessageService {
    content: Arc<dyn ContentStore>,
}

impl MessageService {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    fn materialize(&self, pending: &[PendingFile]) -> Result<Vec<Attachment>> {
        pending
            .iter()
            .map(|p| {
                Ok(Attachment {
                    name: p.file.name.clone(),
                    mime_type: p.file.mime_type.clone(),
                    size: p.file.size,
                    kind: p.kind,
                    content_ref: self.content.store(&p.file)?,
                })
            })
            .collect()
    }

    /// Appends the draft as a new own message and resets the draft.
    ///
    /// Returns [`AppError::InvalidCompose`] without touching anything when
    /// the draft has neither text nor attachments. If storing an attachment
    /// fails the draft is left as it was.
    pub fn compose(
        &self,
        store: &mut MessageStore,
        conversation_id: &ConversationId,
        draft: &mut Draft,
        now: DateTime<Local>,
    ) -> Result<Message> {
        if !draft.can_send() {
            return Err(AppError::InvalidCompose);
        }

        let attachments = self.materialize(draft.attachments.pending())?;
        let message = Message {
            id: store.next_id(conversation_id),
            text: draft.text.clone(),
            timestamp: timestamp_label(&now),
            direction: Direction::Own,
            status: Some(MessageStatus::Sent),
            attachments,
        };

        let message = store.append(conversation_id, message).clone();
        draft.reset();

        tracing::info!(
            "Message {} appended to conversation {} with {} attachment(s)",
            message.id,
            conversation_id,
            message.attachments.len()
        );

        Ok(message)
    }
}

impl Default for MessageService {
    fn default() -> Self {
        Self::new(Arc::new(SessionContentStore))
    }
}
