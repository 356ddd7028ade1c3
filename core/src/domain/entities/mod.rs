//! Domain entities representing core business objects.

pub mod account;
pub mod sign_attempt;
pub mod verification;

// Re-export commonly used types
pub use account::{Account, AccountStatus};
pub use sign_attempt::{SignAttempt, SignOutcome};
pub use verification::{Verification, VerificationChannel};
