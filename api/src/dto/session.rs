use serde::{Deserialize, Serialize};
use validator::Validate;

use sp_core::domain::value_objects::SessionTokens;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    // Existing passwords predate any strength policy, presence is enough
    #[validate(length(min = 1))]
    pub password: String,
}

/// Token lifetimes for the pair delivered alongside this body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExpiryResponse {
    pub access_expires_in: i64,
    pub refresh_expires_in: i64,
}

impl From<&SessionTokens> for SessionExpiryResponse {
    fn from(tokens: &SessionTokens) -> Self {
        Self {
            access_expires_in: tokens.access_expires_in,
            refresh_expires_in: tokens.refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_request_requires_email_shape() {
        let request = SignInRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_err());

        let request = SignInRequest {
            email: "admin@spotless.kr".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_sign_in_request_rejects_empty_password() {
        let request = SignInRequest {
            email: "admin@spotless.kr".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
