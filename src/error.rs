use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Raised by the auth provider when an action such as sign-out fails.
    /// The user keeps whatever session they had.
    #[error("Auth failure: {0}")]
    AuthFailure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Empty text with no attachments, or no active conversation.
    #[error("Nothing to send")]
    InvalidCompose,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    InternalError,
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl AppError {
    /// Human-readable reason suitable for a notification description.
    pub fn reason(&self) -> String {
        match self {
            AppError::Authentication(msg)
            | AppError::AuthFailure(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Config(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
