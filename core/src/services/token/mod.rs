//! Opaque single-use token storage
//!
//! This module handles every token that lives in the key-value store rather
//! than in a signature:
//! - Channel-verification tokens (phone / email ownership proofs)
//! - Intermediate flow tokens (signup, password reset, password confirm)
//! - The refresh-token registry (one live entry per account)
//! - The access-token blacklist

mod payload;
mod store;

#[cfg(test)]
mod tests;

pub use payload::{
    PasswordConfirmPayload, PasswordResetPayload, SignupPayload, TokenPayload, VerificationPayload,
};
pub use store::TokenStore;
