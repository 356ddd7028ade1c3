//! Sign attempt repository interface.

use async_trait::async_trait;

use crate::domain::entities::sign_attempt::SignAttempt;
use crate::errors::DomainError;

/// Repository interface for sign attempt records
#[async_trait]
pub trait SignAttemptRepository: Send + Sync {
    /// Appends an attempt record
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt to persist (identifier is assigned here)
    ///
    /// # Returns
    ///
    /// The stored attempt with its assigned identifier
    async fn insert(&self, attempt: SignAttempt) -> Result<SignAttempt, DomainError>;

    /// Counts unresolved lockout-relevant failures for an account
    ///
    /// Only `INVALID_PASSWORD` rows without a `resolved_by` back-link count.
    async fn count_unresolved_failures(&self, account_id: i64) -> Result<u32, DomainError>;

    /// Inserts a resolving attempt and back-links all unresolved failures
    ///
    /// The insert and the back-link update run in one transaction: either
    /// the resolving row exists and every prior failure points at it, or
    /// nothing changed.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The resolving attempt (successful sign-in or password
    ///   update), which must be attributed to an account
    ///
    /// # Returns
    ///
    /// The stored resolving attempt with its assigned identifier
    async fn insert_resolving(&self, attempt: SignAttempt) -> Result<SignAttempt, DomainError>;
}
