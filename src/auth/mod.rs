pub mod jwt;
pub mod password;

pub mod auth_dto;
pub mod auth_models;
pub mod auth_provider;
pub mod auth_service;

pub use auth_dto::{RegisterRequest, SignInRequest};
pub use auth_models::{view_for, AuthUser, ChatView, Session, SessionEvent, SessionState, UserProfile};
pub use auth_provider::{AuthProvider, SessionHandler, Subscription};
pub use auth_service::LocalAuthProvider;
pub use jwt::{create_access_token, verify_jwt};
pub use password::{hash_password, verify_password};
