//! Repository interfaces (ports) with mock implementations for testing.
//!
//! Concrete MySQL and Redis implementations live in the infra crate.

pub mod account;
pub mod cache;
pub mod sign_attempt;
pub mod verification;

pub use account::{AccountRepository, MockAccountRepository};
pub use cache::{InMemoryCache, KeyValueCache};
pub use sign_attempt::{MockSignAttemptRepository, SignAttemptRepository};
pub use verification::{MockVerificationRepository, VerificationRepository};
