//! Verification repository module.

mod r#trait;
pub use r#trait::VerificationRepository;

mod mock;
pub use mock::MockVerificationRepository;
