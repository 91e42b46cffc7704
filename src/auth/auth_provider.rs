use std::sync::Arc;

use async_trait::async_trait;

use super::auth_dto::SignInRequest;
use super::auth_models::{Session, SessionEvent};
use crate::error::Result;

pub type SessionHandler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Contract of the external authentication backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current session, if any.
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Registers `handler` to run once per session transition. Delivery stops
    /// when the returned subscription is unsubscribed or dropped.
    fn subscribe(&self, handler: SessionHandler) -> Subscription;

    async fn sign_in(&self, request: SignInRequest) -> Result<Session>;

    /// Fails with [`crate::error::AppError::AuthFailure`]; the session is
    /// kept in that case.
    async fn sign_out(&self) -> Result<()>;
}

/// Unsubscribe capability returned by [`AuthProvider::subscribe`].
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
