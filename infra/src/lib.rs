//! Infrastructure adapters for the credential and session subsystem
//!
//! Concrete implementations of the core repository ports:
//! - **Database**: MySQL repositories over SQLx for accounts, sign
//!   attempts and verification rounds
//! - **Cache**: a Redis client backing opaque tokens, the refresh
//!   registry, the access blacklist and rate-limit counters
//!
//! Everything here speaks the core's `DomainError` once constructed;
//! construction itself reports [`InfraError`].

pub mod cache;
pub mod database;

pub use cache::RedisClient;
pub use database::{
    DatabasePool, MySqlAccountRepository, MySqlSignAttemptRepository, MySqlVerificationRepository,
};

/// Errors raised while building infrastructure components
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis connection error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
