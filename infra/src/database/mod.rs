//! MySQL persistence
//!
//! Connection pool management and the repository implementations backing
//! the core's account, sign-attempt and verification ports.

pub mod connection;
pub mod mysql;

pub use connection::DatabasePool;
pub use mysql::{
    MySqlAccountRepository, MySqlSignAttemptRepository, MySqlVerificationRepository,
};
