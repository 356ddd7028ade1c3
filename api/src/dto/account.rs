use serde::{Deserialize, Serialize};
use validator::Validate;

use sp_core::domain::entities::account::Account;

use super::{mobile_phone, strong_password};

/// First signup phase: form submitted together with the email proof
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupTokenRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "strong_password")]
    pub password: String,
    #[validate(must_match = "password")]
    pub confirm_password: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(custom = "mobile_phone")]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordUpdateRequest {
    #[validate(custom = "strong_password")]
    pub password: String,
    #[validate(must_match = "password")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordConfirmRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    /// Version read by the client; a stale value aborts the deletion
    pub version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreatedResponse {
    pub account_id: i64,
    pub email: String,
    pub name: String,
}

impl From<&Account> for AccountCreatedResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id,
            email: account.email.clone(),
            name: account.name.clone(),
        }
    }
}
