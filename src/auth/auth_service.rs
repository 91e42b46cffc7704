use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;
use validator::Validate;

use super::auth_dto::{RegisterRequest, SignInRequest};
use super::auth_models::{AuthUser, Session, SessionEvent, UserProfile};
use super::auth_provider::{AuthProvider, SessionHandler, Subscription};
use super::{create_access_token, hash_password, verify_jwt, verify_password};
use crate::error::{AppError, Result};
use crate::state::Config;

struct Account {
    user: AuthUser,
    password_hash: String,
}

/// In-process auth provider backed by registered accounts.
///
/// Passwords are stored as bcrypt hashes and sessions carry a signed access
/// token. Useful wherever a hosted auth backend is not available.
pub struct LocalAuthProvider {
    jwt_secret: String,
    expiration_hours: i64,
    accounts: DashMap<String, Account>,
    session: RwLock<Option<Session>>,
    handlers: Arc<DashMap<Uuid, SessionHandler>>,
    sign_out_failure: Mutex<Option<String>>,
}

impl LocalAuthProvider {
    pub fn new(jwt_secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            expiration_hours,
            accounts: DashMap::new(),
            session: RwLock::new(None),
            handlers: Arc::new(DashMap::new()),
            sign_out_failure: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.clone(), config.session_expiration_hours)
    }

    pub fn register(&self, payload: RegisterRequest) -> Result<AuthUser> {
        payload.validate()?;

        let key = payload.email.to_lowercase();
        if self.accounts.contains_key(&key) {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(payload.email),
            profile: UserProfile {
                username: payload.username,
                full_name: payload.full_name,
                avatar_url: None,
            },
        };
        let password_hash = hash_password(&payload.password)?;

        self.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password_hash,
            },
        );
        tracing::info!("Registered account {}", user.id);

        Ok(user)
    }

    /// Makes the next `sign_out` call fail with `reason`.
    pub fn fail_next_sign_out(&self, reason: impl Into<String>) -> Result<()> {
        let mut failure = self
            .sign_out_failure
            .lock()
            .map_err(|_| AppError::InternalError)?;
        *failure = Some(reason.into());
        Ok(())
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    fn set_session(&self, session: Option<Session>) -> Result<()> {
        let mut current = self.session.write().map_err(|_| AppError::InternalError)?;
        *current = session;
        Ok(())
    }

    fn emit(&self, event: SessionEvent) {
        // Handlers may unsubscribe while running, so don't hold map guards.
        let handlers: Vec<SessionHandler> =
            self.handlers.iter().map(|entry| entry.value().clone()).collect();
        for handler in handlers {
            handler(&event);
        }
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn current_session(&self) -> Result<Option<Session>> {
        let session = self
            .session
            .read()
            .map_err(|_| AppError::InternalError)?
            .clone();

        match session {
            Some(session) if verify_jwt(&session.access_token, &self.jwt_secret).is_err() => {
                tracing::info!("Session for {} expired", session.user.id);
                self.set_session(None)?;
                self.emit(SessionEvent::Cleared);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn subscribe(&self, handler: SessionHandler) -> Subscription {
        let id = Uuid::new_v4();
        self.handlers.insert(id, handler);

        let registry = Arc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(handlers) = registry.upgrade() {
                handlers.remove(&id);
            }
        })
    }

    async fn sign_in(&self, request: SignInRequest) -> Result<Session> {
        request.validate()?;

        let (user, password_hash) = self
            .accounts
            .get(&request.email.to_lowercase())
            .map(|account| (account.user.clone(), account.password_hash.clone()))
            .ok_or_else(|| AppError::Authentication("Invalid credentials".into()))?;

        if !verify_password(&request.password, &password_hash)? {
            return Err(AppError::Authentication("Invalid credentials".into()));
        }

        let (access_token, expires_at) = create_access_token(
            user.id,
            user.email.as_deref(),
            &self.jwt_secret,
            self.expiration_hours,
        )?;
        let session = Session {
            user,
            access_token,
            expires_at,
        };

        self.set_session(Some(session.clone()))?;
        tracing::info!("User {} signed in", session.user.id);
        self.emit(SessionEvent::Established(session.clone()));

        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let injected = self
            .sign_out_failure
            .lock()
            .map_err(|_| AppError::InternalError)?
            .take();
        if let Some(reason) = injected {
            return Err(AppError::AuthFailure(reason));
        }

        let previous = self
            .session
            .write()
            .map_err(|_| AppError::InternalError)?
            .take();

        match previous {
            Some(session) => {
                tracing::info!("User {} signed out", session.user.id);
                self.emit(SessionEvent::Cleared);
                Ok(())
            }
            None => Err(AppError::AuthFailure("No active session".to_string())),
        }
    }
}
