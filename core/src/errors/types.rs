//! Error type definitions for the credential and session subsystem
//!
//! Each component reports through its own enum so callers can match on the
//! failure class. HTTP status and response codes are assigned in the
//! presentation layer, never here.

use thiserror::Error;

/// Opaque-token store errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Presented key is blank or structurally unusable
    #[error("Illegal token key")]
    IllegalToken,

    /// No live entry under the key (missing or already expired)
    #[error("Token not found")]
    NoSuchToken,

    /// Stored value does not match the presented one
    #[error("Token value mismatch")]
    ValueMismatch,

    #[error("Token store read failed: {message}")]
    StoreReadFailed { message: String },

    #[error("Token store write failed: {message}")]
    StoreWriteFailed { message: String },
}

/// Signed-credential (JWT) errors
///
/// Deliberately coarse: expiry is the only failure class callers may branch
/// on. Signature, structure and issuer problems all collapse into
/// `ValidationFailed` so responses leak nothing about why a forgery failed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Credential expired")]
    TimedOut,

    #[error("Credential validation failed")]
    ValidationFailed,

    #[error("Missing claim: {claim}")]
    MissingClaim { claim: String },

    #[error("Credential build failed")]
    BuildFailed,
}

/// Claim cipher errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("Invalid cipher key")]
    InvalidKey,

    #[error("Encryption failed")]
    EncryptFailed,

    #[error("Decryption failed")]
    DecryptFailed,

    #[error("Malformed ciphertext")]
    Malformed,
}

/// Sign-in / sign-out / account flow errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignError {
    /// Unknown email or wrong password, indistinguishable on purpose
    #[error("Email or password does not match")]
    MismatchCredentials { count: u32 },

    /// Unresolved failure count reached the lockout threshold
    #[error("Too many sign-in failures: {count}")]
    TooManyFailures { count: u32 },

    #[error("Account is suspended")]
    StatusStay,

    #[error("Account is stopped")]
    StatusStop,

    #[error("Account is deleted")]
    StatusDelete,

    #[error("Account not found")]
    AccountNotFound,
}

/// Verification lookup errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Verification not found")]
    NoSuchVerification,

    #[error("Verification window elapsed")]
    Expired,

    #[error("Recipient not verified")]
    NotVerified,
}

/// Rate limiting errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Too many requests: limit {limit} per {window_seconds}s")]
    TooManyRequests { limit: u32, window_seconds: u64 },
}
