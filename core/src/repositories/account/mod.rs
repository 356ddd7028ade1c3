//! Account repository module.

mod r#trait;
pub use r#trait::AccountRepository;

mod mock;
pub use mock::MockAccountRepository;
