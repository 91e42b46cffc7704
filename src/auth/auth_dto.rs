use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 255))]
    pub username: Option<String>,
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

impl SignInRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_request_validation() {
        assert!(SignInRequest::new("alice@example.com", "hunter22").validate().is_ok());
        assert!(SignInRequest::new("not-an-email", "hunter22").validate().is_err());
        assert!(SignInRequest::new("alice@example.com", "short").validate().is_err());
    }

    #[test]
    fn test_register_request_username_length() {
        let request = RegisterRequest {
            username: Some("al".to_string()),
            full_name: None,
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
