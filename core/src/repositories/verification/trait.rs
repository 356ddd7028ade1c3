//! Verification repository interface.
//!
//! Verification rows are written by the code-delivery collaborator; this
//! subsystem only reads them to gate flows on confirmed ownership.

use async_trait::async_trait;

use crate::domain::entities::verification::Verification;
use crate::errors::DomainError;

/// Repository interface for verification lookups
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Finds a verification round by its identifier
    ///
    /// # Arguments
    ///
    /// * `verification_id` - The verification identifier
    ///
    /// # Returns
    ///
    /// `Ok(Some(verification))` when found, `Ok(None)` otherwise
    async fn find_by_id(&self, verification_id: i64) -> Result<Option<Verification>, DomainError>;
}
