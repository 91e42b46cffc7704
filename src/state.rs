use std::sync::Arc;

use crate::attachment::MAX_ATTACHMENT_BYTES;
use crate::auth::AuthProvider;
use crate::error::{AppError, Result};
use crate::notification::NotificationSink;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<dyn AuthProvider>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl AppState {
    pub fn new(
        config: Config,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            auth,
            notifier,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub session_expiration_hours: i64,
    pub max_attachment_bytes: u64,
    pub seed_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Config("JWT_SECRET must be set".to_string()))?;

        let session_expiration_hours = match lookup("SESSION_EXPIRATION_HOURS") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                AppError::Config("SESSION_EXPIRATION_HOURS must be a number".to_string())
            })?,
            None => 24,
        };
        if session_expiration_hours <= 0 {
            return Err(AppError::Config(
                "SESSION_EXPIRATION_HOURS must be positive".to_string(),
            ));
        }

        let max_attachment_bytes = match lookup("MAX_ATTACHMENT_BYTES") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config("MAX_ATTACHMENT_BYTES must be a number".to_string())
            })?,
            None => MAX_ATTACHMENT_BYTES,
        };
        if max_attachment_bytes > MAX_ATTACHMENT_BYTES {
            return Err(AppError::Config(format!(
                "MAX_ATTACHMENT_BYTES cannot exceed {}",
                MAX_ATTACHMENT_BYTES
            )));
        }

        Ok(Self {
            jwt_secret,
            session_expiration_hours,
            max_attachment_bytes,
            seed_path: lookup("CHAT_SEED_PATH").filter(|s| !s.trim().is_empty()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jwt_secret: "geo-chat-dev-secret".to_string(),
            session_expiration_hours: 24,
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
            seed_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.session_expiration_hours, 24);
        assert_eq!(config.max_attachment_bytes, 10 * 1024 * 1024);
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn test_config_requires_secret() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("SESSION_EXPIRATION_HOURS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_config_caps_attachment_limit() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("MAX_ATTACHMENT_BYTES", "20971520"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("MAX_ATTACHMENT_BYTES", "1024"),
            ("CHAT_SEED_PATH", "fixtures/seed.json"),
        ]))
        .unwrap();
        assert_eq!(config.max_attachment_bytes, 1024);
        assert_eq!(config.seed_path.as_deref(), Some("fixtures/seed.json"));
    }
}
