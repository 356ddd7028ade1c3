//! Sign attempt repository module.

mod r#trait;
pub use r#trait::SignAttemptRepository;

mod mock;
pub use mock::MockSignAttemptRepository;
