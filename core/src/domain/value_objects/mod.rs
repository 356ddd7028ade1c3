//! Value objects representing immutable domain concepts.

pub mod credential;
pub mod token_purpose;
pub mod versioned;

// Re-export commonly used types
pub use credential::{Claims, SessionTokens, ROLE_ADMIN, ROLE_AUTH};
pub use token_purpose::{BlacklistReason, TokenPurpose};
pub use versioned::Versioned;
