//! Business services for the credential and session subsystem.

pub mod cipher;
pub mod credential;
pub mod rate_limit;
pub mod session;
pub mod sign_attempt;
pub mod token;
pub mod verification;

// Re-export commonly used services
pub use cipher::ClaimCipher;
pub use credential::CredentialCodec;
pub use rate_limit::{RateLimitAction, RateLimiter};
pub use session::{AccessDecision, SessionService, SessionServiceConfig};
pub use sign_attempt::{SignAttemptTracker, TrackerConfig};
pub use token::{
    PasswordConfirmPayload, PasswordResetPayload, SignupPayload, TokenStore, VerificationPayload,
};
pub use verification::VerificationGate;
