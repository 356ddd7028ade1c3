//! Attempt tracker implementation

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::entities::sign_attempt::{SignAttempt, SignOutcome};
use crate::errors::{DomainResult, SignError};
use crate::repositories::SignAttemptRepository;

/// Unresolved password failures at which an account is suspended
pub const MAX_UNRESOLVED_FAILURES: u32 = 10;

/// Tuning for the attempt tracker
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Unresolved INVALID_PASSWORD rows that trigger the lockout
    pub max_unresolved_failures: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_unresolved_failures: MAX_UNRESOLVED_FAILURES,
        }
    }
}

/// Records authentication events and enforces the failure threshold
pub struct SignAttemptTracker<S: SignAttemptRepository> {
    repository: Arc<S>,
    config: TrackerConfig,
}

impl<S: SignAttemptRepository> SignAttemptTracker<S> {
    /// Creates a tracker with the default threshold
    pub fn new(repository: Arc<S>) -> Self {
        Self::with_config(repository, TrackerConfig::default())
    }

    /// Creates a tracker with explicit configuration
    pub fn with_config(repository: Arc<S>, config: TrackerConfig) -> Self {
        Self { repository, config }
    }

    /// Appends an attempt record, best effort
    ///
    /// Audit writes never block a sign flow: a persistence failure is
    /// logged and swallowed, and the caller gets `None` instead of an id.
    pub async fn record(
        &self,
        account_id: Option<i64>,
        outcome: SignOutcome,
        client_ip: &str,
        reason: Option<&str>,
    ) -> Option<i64> {
        let mut attempt = SignAttempt::new(outcome, client_ip);
        if let Some(account_id) = account_id {
            attempt = attempt.with_account(account_id);
        }
        if let Some(reason) = reason {
            attempt = attempt.with_reason(reason);
        }

        match self.repository.insert(attempt).await {
            Ok(stored) => Some(stored.attempt_id),
            Err(e) => {
                error!(
                    outcome = outcome.as_str(),
                    error = %e,
                    "failed to record sign attempt"
                );
                None
            }
        }
    }

    /// Current unresolved failure count for an account
    pub async fn unresolved_failure_count(&self, account_id: i64) -> DomainResult<u32> {
        self.repository.count_unresolved_failures(account_id).await
    }

    /// Counts unresolved failures, rejecting once the threshold is hit
    pub async fn check_failures(&self, account_id: i64) -> DomainResult<u32> {
        let count = self.repository.count_unresolved_failures(account_id).await?;
        if count >= self.config.max_unresolved_failures {
            warn!(account_id, count, "sign failure threshold reached");
            return Err(SignError::TooManyFailures { count }.into());
        }
        Ok(count)
    }

    /// Records a resolving attempt, back-linking every unresolved failure
    pub async fn record_resolving(
        &self,
        account_id: i64,
        outcome: SignOutcome,
        client_ip: &str,
    ) -> DomainResult<i64> {
        let attempt = SignAttempt::new(outcome, client_ip).with_account(account_id);
        let stored = self.repository.insert_resolving(attempt).await?;
        Ok(stored.attempt_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use crate::repositories::MockSignAttemptRepository;

    fn tracker() -> SignAttemptTracker<MockSignAttemptRepository> {
        SignAttemptTracker::new(Arc::new(MockSignAttemptRepository::new()))
    }

    #[tokio::test]
    async fn test_record_persists_attempt() {
        let tracker = tracker();
        let id = tracker
            .record(
                Some(7),
                SignOutcome::InvalidPassword,
                "10.0.0.1",
                Some("password mismatch"),
            )
            .await;
        assert!(id.is_some());

        let recorded = tracker.repository.recorded().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].account_id, Some(7));
        assert_eq!(recorded[0].outcome, SignOutcome::InvalidPassword);
        assert_eq!(recorded[0].client_ip, "10.0.0.1");
        assert_eq!(recorded[0].reason.as_deref(), Some("password mismatch"));
    }

    #[tokio::test]
    async fn test_record_without_account() {
        let tracker = tracker();
        tracker
            .record(None, SignOutcome::InvalidPassword, "10.0.0.1", None)
            .await;

        let recorded = tracker.repository.recorded().await;
        assert_eq!(recorded[0].account_id, None);
        // Unattributed failures count toward no account.
        assert_eq!(tracker.unresolved_failure_count(7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_password_failures_count() {
        let tracker = tracker();
        tracker
            .record(Some(7), SignOutcome::InvalidPassword, "10.0.0.1", None)
            .await;
        tracker
            .record(Some(7), SignOutcome::RefreshFail, "10.0.0.1", None)
            .await;
        tracker
            .record(Some(7), SignOutcome::Signout, "10.0.0.1", None)
            .await;

        assert_eq!(tracker.unresolved_failure_count(7).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_check_failures_below_threshold() {
        let tracker = tracker();
        for _ in 0..9 {
            tracker
                .record(Some(7), SignOutcome::InvalidPassword, "10.0.0.1", None)
                .await;
        }
        assert_eq!(tracker.check_failures(7).await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_check_failures_at_threshold() {
        let tracker = tracker();
        for _ in 0..MAX_UNRESOLVED_FAILURES {
            tracker
                .record(Some(7), SignOutcome::InvalidPassword, "10.0.0.1", None)
                .await;
        }

        let result = tracker.check_failures(7).await;
        assert!(matches!(
            result,
            Err(DomainError::Sign(SignError::TooManyFailures { count: 10 }))
        ));
    }

    #[tokio::test]
    async fn test_resolving_clears_count() {
        let tracker = tracker();
        for _ in 0..3 {
            tracker
                .record(Some(7), SignOutcome::InvalidPassword, "10.0.0.1", None)
                .await;
        }
        assert_eq!(tracker.unresolved_failure_count(7).await.unwrap(), 3);

        let resolving_id = tracker
            .record_resolving(7, SignOutcome::Signin, "10.0.0.1")
            .await
            .unwrap();

        assert_eq!(tracker.unresolved_failure_count(7).await.unwrap(), 0);
        let back_linked = tracker
            .repository
            .recorded()
            .await
            .into_iter()
            .filter(|a| a.resolved_by == Some(resolving_id))
            .count();
        assert_eq!(back_linked, 3);
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let tracker = SignAttemptTracker::with_config(
            Arc::new(MockSignAttemptRepository::new()),
            TrackerConfig {
                max_unresolved_failures: 2,
            },
        );
        tracker
            .record(Some(7), SignOutcome::InvalidPassword, "10.0.0.1", None)
            .await;
        assert!(tracker.check_failures(7).await.is_ok());

        tracker
            .record(Some(7), SignOutcome::InvalidPassword, "10.0.0.1", None)
            .await;
        assert!(matches!(
            tracker.check_failures(7).await,
            Err(DomainError::Sign(SignError::TooManyFailures { count: 2 }))
        ));
    }
}
