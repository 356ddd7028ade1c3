//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{
    CipherError, CredentialError, RateLimitError, SignError, TokenError, VerificationError,
};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Stale update: submitted version {submitted}, current version {current}")]
    VersionConflict { submitted: i64, current: i64 },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Sign(#[from] SignError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
}

pub type DomainResult<T> = Result<T, DomainError>;
