use std::sync::Arc;

use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::attachment::{RawFile, Rejection, SelectionReport};
use crate::auth::{view_for, ChatView, Session, SessionEvent, SessionState, Subscription};
use crate::conversation::{Conversation, ConversationId, ConversationSelector};
use crate::error::{AppError, Result};
use crate::message::{Draft, Message, MessageService, MessageStore};
use crate::notification::Notice;
use crate::seed::ChatSeed;
use crate::state::AppState;

/// The chat screen: conversation list, active thread and compose box, gated
/// behind an authenticated session.
pub struct ChatPage {
    state: AppState,
    selector: ConversationSelector,
    messages: MessageStore,
    service: MessageService,
    draft: Draft,
    session_tx: Arc<watch::Sender<SessionState>>,
    session_rx: watch::Receiver<SessionState>,
    subscription: Option<Subscription>,
}

impl ChatPage {
    pub fn new(state: AppState, seed: ChatSeed) -> Self {
        let (session_tx, session_rx) = watch::channel(SessionState::Loading);
        let draft = Draft::new(state.config.max_attachment_bytes);

        Self {
            state,
            selector: ConversationSelector::new(seed.conversations),
            messages: MessageStore::new(seed.threads),
            service: MessageService::default(),
            draft,
            session_tx: Arc::new(session_tx),
            session_rx,
            subscription: None,
        }
    }

    pub fn with_message_service(mut self, service: MessageService) -> Self {
        self.service = service;
        self
    }

    /// Subscribes to session changes, then resolves the current session.
    pub async fn mount(state: AppState, seed: ChatSeed) -> Result<Self> {
        let mut page = Self::new(state, seed);

        let tx = page.session_tx.clone();
        page.subscription = Some(page.state.auth.subscribe(Arc::new(
            move |event: &SessionEvent| {
                tx.send_replace(SessionState::from(event));
            },
        )));

        page.refresh_session().await?;
        Ok(page)
    }

    /// Stops listening for session changes.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    pub async fn refresh_session(&self) -> Result<()> {
        let session = self.state.auth.current_session().await?;
        self.on_session_change(session);
        Ok(())
    }

    pub fn on_session_change(&self, session: Option<Session>) {
        let next = SessionState::from(session);
        if matches!(next, SessionState::SignedOut) {
            debug!("No session, redirecting to auth");
        }
        self.session_tx.send_replace(next);
    }

    pub fn session_state(&self) -> SessionState {
        self.session_rx.borrow().clone()
    }

    pub fn view(&self) -> ChatView {
        view_for(&self.session_rx.borrow())
    }

    pub fn greeting(&self) -> Option<String> {
        self.session_rx
            .borrow()
            .session()
            .map(|session| format!("Welcome, {}", session.user.display_name()))
    }

    fn is_open(&self) -> bool {
        self.view() == ChatView::Chat
    }

    pub fn conversations(&self) -> &[Conversation] {
        self.selector.conversations()
    }

    pub fn select_conversation(&mut self, id: &ConversationId) -> bool {
        if !self.is_open() {
            return false;
        }
        self.selector.select(id).is_some()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.selector.active()
    }

    pub fn is_selected(&self, id: &ConversationId) -> bool {
        self.selector.is_selected(id)
    }

    /// Messages of the active conversation; empty when none is selected.
    pub fn thread(&self) -> &[Message] {
        match self.selector.active_id() {
            Some(id) => self.messages.thread(id),
            None => &[],
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        if self.is_open() {
            self.draft.text = text.into();
        }
    }

    pub fn can_send(&self) -> bool {
        self.is_open() && self.selector.active().is_some() && self.draft.can_send()
    }

    /// Runs a picked batch through validation and reports every rejection.
    pub fn attach(&mut self, batch: Vec<RawFile>) -> SelectionReport {
        if !self.is_open() {
            return SelectionReport::default();
        }

        let report = self.draft.attachments.select(batch);
        for notice in report.rejections.iter().map(Rejection::notice) {
            self.state.notifier.notify(notice);
        }
        report
    }

    pub fn remove_attachment(&mut self, index: usize) {
        if self.is_open() {
            self.draft.attachments.remove(index);
        }
    }

    /// Sends the draft to the active conversation. Does nothing when there
    /// is nothing to send or no conversation is open.
    pub fn send(&mut self) -> Option<Message> {
        if !self.is_open() {
            return None;
        }
        let conversation_id = self.selector.active_id()?.clone();

        match self.service.compose(
            &mut self.messages,
            &conversation_id,
            &mut self.draft,
            Local::now(),
        ) {
            Ok(message) => {
                if !message.attachments.is_empty() {
                    self.state.notifier.notify(Notice::info(
                        "Files shared",
                        format!(
                            "{} file(s) attached to your message.",
                            message.attachments.len()
                        ),
                    ));
                }
                Some(message)
            }
            Err(AppError::InvalidCompose) => {
                debug!("Ignoring empty compose");
                None
            }
            Err(e) => {
                tracing::error!("Failed to send message: {:?}", e);
                self.state
                    .notifier
                    .notify(Notice::error("Message not sent", e.reason()));
                None
            }
        }
    }

    /// Signs out. On failure the user stays signed in and the reason is
    /// surfaced as a notice.
    pub async fn logout(&self) -> Result<()> {
        match self.state.auth.sign_out().await {
            Ok(()) => {
                self.on_session_change(None);
                info!("Logged out");
                self.state.notifier.notify(Notice::info(
                    "Logged Out",
                    "You have been successfully logged out.",
                ));
                Ok(())
            }
            Err(e) => {
                self.state
                    .notifier
                    .notify(Notice::error("Logout Failed", e.reason()));
                Err(e)
            }
        }
    }
}

impl Drop for ChatPage {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::RejectionReason;
    use crate::auth::{AuthProvider, LocalAuthProvider, RegisterRequest, SignInRequest};
    use crate::message::{Direction, MessageStatus};
    use crate::notification::{BroadcastSink, Severity};
    use crate::state::Config;
    use tokio::sync::broadcast;

    const MIB: u64 = 1024 * 1024;

    struct Harness {
        auth: Arc<LocalAuthProvider>,
        notices: broadcast::Receiver<Notice>,
        state: AppState,
    }

    fn harness() -> Harness {
        let auth = Arc::new(LocalAuthProvider::new("test-secret", 24));
        auth.register(RegisterRequest {
            username: Some("geo".to_string()),
            full_name: None,
            email: "geo@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .unwrap();

        let sink = Arc::new(BroadcastSink::default());
        let notices = sink.subscribe();
        let state = AppState::new(Config::default(), auth.clone(), sink);

        Harness {
            auth,
            notices,
            state,
        }
    }

    async fn signed_in_page(h: &Harness) -> ChatPage {
        h.auth
            .sign_in(SignInRequest::new("geo@example.com", "hunter22"))
            .await
            .unwrap();
        let mut page = ChatPage::mount(h.state.clone(), ChatSeed::demo()).await.unwrap();
        assert!(page.select_conversation(&"1".into()));
        page
    }

    fn drain(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = rx.try_recv() {
            notices.push(notice);
        }
        notices
    }

    #[tokio::test]
    async fn test_chat_is_gated_behind_session() {
        let h = harness();
        let page = ChatPage::new(h.state.clone(), ChatSeed::demo());
        assert_eq!(page.view(), ChatView::Loading);

        let mut page = ChatPage::mount(h.state.clone(), ChatSeed::demo()).await.unwrap();
        assert_eq!(page.view(), ChatView::RedirectToAuth);
        assert!(page.greeting().is_none());
        assert!(!page.select_conversation(&"1".into()));

        h.auth
            .sign_in(SignInRequest::new("geo@example.com", "hunter22"))
            .await
            .unwrap();
        assert_eq!(page.view(), ChatView::Chat);
        assert_eq!(page.greeting().as_deref(), Some("Welcome, geo"));
        assert!(page.select_conversation(&"1".into()));
    }

    #[tokio::test]
    async fn test_mixed_batch_reports_unsupported_file() {
        let mut h = harness();
        let mut page = signed_in_page(&h).await;

        let report = page.attach(vec![
            RawFile::new("photo.png", "image/png", 2 * MIB),
            RawFile::new("movie.mkv", "video/x-matroska", 3 * MIB),
        ]);

        let pending: Vec<&str> = page
            .draft()
            .attachments
            .pending()
            .iter()
            .map(|p| p.file.name.as_str())
            .collect();
        assert_eq!(pending, vec!["photo.png"]);
        assert_eq!(report.rejections.len(), 1);
        assert_eq!(report.rejections[0].reason, RejectionReason::UnsupportedType);

        let notices = drain(&mut h.notices);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Invalid file type");
        assert!(notices[0].description.starts_with("movie.mkv"));
    }

    #[tokio::test]
    async fn test_oversized_file_leaves_selection_empty() {
        let mut h = harness();
        let mut page = signed_in_page(&h).await;

        let report = page.attach(vec![RawFile::new("report.pdf", "application/pdf", 12 * MIB)]);

        assert!(page.draft().attachments.is_empty());
        assert_eq!(report.rejections[0].reason, RejectionReason::TooLarge);
        let notices = drain(&mut h.notices);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "File too large");
        assert_eq!(notices[0].severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn test_send_attachment_without_text() {
        let mut h = harness();
        let mut page = signed_in_page(&h).await;
        let before = page.thread().len();

        page.attach(vec![RawFile::new("cat.jpg", "image/jpeg", 300 * 1024)]);
        let message = page.send().unwrap();

        assert_eq!(page.thread().len(), before + 1);
        assert!(message.text.is_empty());
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.direction, Direction::Own);
        assert_eq!(message.status, Some(MessageStatus::Sent));
        assert!(page.draft().text.is_empty());
        assert!(page.draft().attachments.is_empty());

        let notices = drain(&mut h.notices);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Files shared");
    }

    #[tokio::test]
    async fn test_send_whitespace_is_ignored() {
        let h = harness();
        let mut page = signed_in_page(&h).await;
        let before = page.thread().len();

        page.set_draft_text("  ");
        assert!(!page.can_send());
        assert!(page.send().is_none());
        assert_eq!(page.thread().len(), before);
    }

    #[tokio::test]
    async fn test_send_text_appends_to_active_thread_only() {
        let h = harness();
        let mut page = signed_in_page(&h).await;
        assert_eq!(page.thread().len(), 3);

        page.set_draft_text("Sounds exciting!");
        assert!(page.can_send());
        let message = page.send().unwrap();
        assert_eq!(message.id, "4");
        assert_eq!(page.thread().last().map(|m| m.text.as_str()), Some("Sounds exciting!"));
        assert!(page.draft().text.is_empty());

        assert!(page.select_conversation(&"2".into()));
        assert!(page.thread().is_empty());

        // Previews and counters are not touched by sending.
        let alice = &page.conversations()[0];
        assert_eq!(alice.last_message, "Hey! How are you doing?");
        assert_eq!(alice.unread_count, Some(2));
    }

    #[tokio::test]
    async fn test_send_without_selection_is_ignored() {
        let h = harness();
        h.auth
            .sign_in(SignInRequest::new("geo@example.com", "hunter22"))
            .await
            .unwrap();
        let mut page = ChatPage::mount(h.state.clone(), ChatSeed::demo()).await.unwrap();

        page.set_draft_text("hello?");
        assert!(page.thread().is_empty());
        assert!(page.send().is_none());
        assert_eq!(page.draft().text, "hello?");
    }

    #[tokio::test]
    async fn test_remove_attachment_by_position() {
        let h = harness();
        let mut page = signed_in_page(&h).await;
        page.attach(vec![
            RawFile::new("a.png", "image/png", 1),
            RawFile::new("b.mp4", "video/mp4", 1),
        ]);

        page.remove_attachment(5);
        assert_eq!(page.draft().attachments.pending().len(), 2);
        page.remove_attachment(0);
        assert_eq!(page.draft().attachments.pending()[0].file.name, "b.mp4");
    }

    #[tokio::test]
    async fn test_logout_success_and_failure() {
        let mut h = harness();
        let page = signed_in_page(&h).await;

        h.auth.fail_next_sign_out("Network request failed").unwrap();
        assert!(page.logout().await.is_err());
        assert_eq!(page.view(), ChatView::Chat);
        let notices = drain(&mut h.notices);
        assert_eq!(notices[0].title, "Logout Failed");
        assert_eq!(notices[0].description, "Network request failed");

        page.logout().await.unwrap();
        assert_eq!(page.view(), ChatView::RedirectToAuth);
        let notices = drain(&mut h.notices);
        assert_eq!(notices[0].title, "Logged Out");
        assert_eq!(notices[0].severity, Severity::Default);
    }

    #[tokio::test]
    async fn test_unmount_stops_session_updates() {
        let h = harness();
        let mut page = ChatPage::mount(h.state.clone(), ChatSeed::demo()).await.unwrap();
        assert_eq!(h.auth.subscriber_count(), 1);

        page.unmount();
        assert_eq!(h.auth.subscriber_count(), 0);

        h.auth
            .sign_in(SignInRequest::new("geo@example.com", "hunter22"))
            .await
            .unwrap();
        assert_eq!(page.view(), ChatView::RedirectToAuth);
    }
}
