//! Request and response bodies
//!
//! Validation rules live on the request types; custom rules delegate to
//! the shared validation helpers so the api and the domain agree on what
//! a usable email, phone or password looks like.

pub mod account;
pub mod session;

pub use account::{
    AccountCreatedResponse, DeleteAccountRequest, PasswordConfirmRequest, PasswordResetRequest,
    PasswordUpdateRequest, SignupTokenRequest,
};
pub use session::{SessionExpiryResponse, SignInRequest};

use validator::ValidationError;

use sp_shared::validation;

pub(crate) fn strong_password(value: &str) -> Result<(), ValidationError> {
    if validation::is_strong_password(value) {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password"))
    }
}

pub(crate) fn mobile_phone(value: &str) -> Result<(), ValidationError> {
    if validation::is_valid_phone(value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}
