//! Verification gate implementation

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::domain::entities::verification::Verification;
use crate::errors::{DomainResult, VerificationError};
use crate::repositories::VerificationRepository;

/// Decides whether a verification round proves channel ownership
///
/// A round passes only when it exists, is still inside its channel window
/// and the recipient confirmed the code. The window check runs first so an
/// unverified-but-stale round reports `Expired`, not `NotVerified`.
pub struct VerificationGate<V: VerificationRepository> {
    repository: Arc<V>,
}

impl<V: VerificationRepository> VerificationGate<V> {
    /// Creates a gate over a verification repository
    pub fn new(repository: Arc<V>) -> Self {
        Self { repository }
    }

    /// Requires a confirmed, still-fresh verification round
    pub async fn require_verified(&self, verification_id: i64) -> DomainResult<Verification> {
        let verification = self
            .repository
            .find_by_id(verification_id)
            .await?
            .ok_or(VerificationError::NoSuchVerification)?;

        if !verification.is_within_window(Utc::now()) {
            return Err(VerificationError::Expired.into());
        }
        if !verification.verified {
            return Err(VerificationError::NotVerified.into());
        }

        debug!(
            verification_id,
            channel = verification.channel.as_str(),
            "verification gate passed"
        );
        Ok(verification)
    }
}
