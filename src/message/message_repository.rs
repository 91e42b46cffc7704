use std::collections::HashMap;

use crate::conversation::ConversationId;
use crate::message::message_models::Message;

/// Append-only message threads, one per conversation.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    threads: HashMap<ConversationId, Vec<Message>>,
}

impl MessageStore {
    pub fn new(threads: HashMap<ConversationId, Vec<Message>>) -> Self {
        Self { threads }
    }

    /// Messages of a conversation in display order. Unknown conversations
    /// have an empty thread.
    pub fn thread(&self, conversation_id: &ConversationId) -> &[Message] {
        self.threads
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, conversation_id: &ConversationId) -> usize {
        self.thread(conversation_id).len()
    }

    /// Next id for a conversation: one past the largest numeric id in the
    /// thread (and never below length + 1), so it cannot collide with a
    /// seeded id.
    pub fn next_id(&self, conversation_id: &ConversationId) -> String {
        let thread = self.thread(conversation_id);
        let highest = thread
            .iter()
            .filter_map(|m| m.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        highest.max(thread.len() as u64).saturating_add(1).to_string()
    }

    pub fn append(&mut self, conversation_id: &ConversationId, message: Message) -> &Message {
        let thread = self.threads.entry(conversation_id.clone()).or_default();
        thread.push(message);
        &thread[thread.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::message_models::{Direction, MessageStatus};

    fn message(id: &str, text: &str) -> Message {
        Message {
            id: id.to_string(),
            text: text.to_string(),
            timestamp: "10:00".to_string(),
            direction: Direction::Own,
            status: Some(MessageStatus::Sent),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_append_keeps_order_per_conversation() {
        let mut store = MessageStore::default();
        let alice = ConversationId::from("1");
        let bob = ConversationId::from("2");

        assert_eq!(store.next_id(&alice), "1");
        store.append(&alice, message("1", "first"));
        store.append(&alice, message("2", "second"));
        store.append(&bob, message("1", "other"));

        let texts: Vec<&str> = store.thread(&alice).iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(store.len(&bob), 1);
        assert_eq!(store.next_id(&alice), "3");
        assert!(store.thread(&"9".into()).is_empty());
    }

    #[test]
    fn test_next_id_skips_seeded_ids() {
        let alice = ConversationId::from("1");
        let mut threads = HashMap::new();
        threads.insert(alice.clone(), vec![message("2", "b"), message("3", "c")]);
        let mut store = MessageStore::new(threads);

        let id = store.next_id(&alice);
        assert_eq!(id, "4");
        store.append(&alice, message(&id, "d"));

        let ids: Vec<&str> = store.thread(&alice).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_next_id_with_non_numeric_ids() {
        let bob = ConversationId::from("2");
        let mut threads = HashMap::new();
        threads.insert(bob.clone(), vec![message("a", "x"), message("b", "y")]);
        let store = MessageStore::new(threads);
        assert_eq!(store.next_id(&bob), "3");
    }
}
