//! MySQL repository implementations

mod account_repository_impl;
mod sign_attempt_repository_impl;
mod verification_repository_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use sign_attempt_repository_impl::MySqlSignAttemptRepository;
pub use verification_repository_impl::MySqlVerificationRepository;
