use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile metadata attached to an identity by the auth backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub profile: UserProfile,
}

impl AuthUser {
    /// Username, then full name, then the local part of the email address,
    /// then a generic fallback. Blank values are skipped.
    pub fn display_name(&self) -> String {
        fn non_blank(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        non_blank(self.profile.username.as_deref())
            .or_else(|| non_blank(self.profile.full_name.as_deref()))
            .or_else(|| {
                non_blank(self.email.as_deref())
                    .and_then(|email| email.split('@').next())
                    .filter(|local| !local.is_empty())
            })
            .unwrap_or("User")
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// A change delivered to session subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Established(Session),
    Cleared,
}

/// Latest known session as seen by the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

impl From<Option<Session>> for SessionState {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionState::SignedIn(session),
            None => SessionState::SignedOut,
        }
    }
}

impl From<&SessionEvent> for SessionState {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::Established(session) => SessionState::SignedIn(session.clone()),
            SessionEvent::Cleared => SessionState::SignedOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatView {
    Loading,
    RedirectToAuth,
    Chat,
}

/// The chat view only renders once a session is confirmed.
pub fn view_for(state: &SessionState) -> ChatView {
    match state {
        SessionState::Loading => ChatView::Loading,
        SessionState::SignedOut => ChatView::RedirectToAuth,
        SessionState::SignedIn(_) => ChatView::Chat,
    }
}
