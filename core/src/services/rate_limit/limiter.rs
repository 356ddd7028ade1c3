//! Rate limiter implementation

use std::sync::Arc;

use tracing::debug;

use crate::errors::{DomainResult, RateLimitError};
use crate::repositories::KeyValueCache;

/// Guarded actions and their per-window budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitAction {
    /// Verification code requests, keyed by recipient
    VerificationCode,
    /// Estimate submissions, keyed by client IP
    EstimateSubmit,
    /// Question submissions, keyed by client IP
    QuestionSubmit,
    /// Any request from one client IP
    ClientRequest,
}

impl RateLimitAction {
    /// Key fragment identifying the action in the store
    pub fn key_fragment(&self) -> &'static str {
        match self {
            Self::VerificationCode => "verification_code",
            Self::EstimateSubmit => "estimate_submit",
            Self::QuestionSubmit => "question_submit",
            Self::ClientRequest => "client_request",
        }
    }

    /// Requests allowed per window
    pub fn max_requests(&self) -> u32 {
        match self {
            Self::VerificationCode => 10,
            Self::EstimateSubmit => 5,
            Self::QuestionSubmit => 5,
            Self::ClientRequest => 30,
        }
    }

    /// Window length in seconds
    pub fn window_seconds(&self) -> u64 {
        // Every action shares the thirty-minute window.
        30 * 60
    }

    fn storage_key(&self, subject: &str) -> String {
        format!("rate_limit:{}:{}", self.key_fragment(), subject)
    }
}

/// Fixed-window rate limiter over the key-value store
///
/// One atomic INCR per check; the entry's TTL is set when the counter is
/// created, so the window runs from the first request.
pub struct RateLimiter<C: KeyValueCache> {
    cache: Arc<C>,
}

impl<C: KeyValueCache> RateLimiter<C> {
    /// Creates a limiter over a cache backend
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Consumes one request from the subject's budget
    ///
    /// # Arguments
    ///
    /// * `action` - Which budget applies
    /// * `subject` - Recipient or client IP the budget is keyed by
    ///
    /// # Returns
    ///
    /// `Ok(())` while the budget holds, `RateLimitError::TooManyRequests`
    /// once it is spent
    pub async fn check_and_consume(
        &self,
        action: RateLimitAction,
        subject: &str,
    ) -> DomainResult<()> {
        let key = action.storage_key(subject);
        let count = self.cache.increment(&key).await?;

        if count == 1 {
            self.cache.expire(&key, action.window_seconds()).await?;
        }

        debug!(
            key = %key,
            count,
            max = action.max_requests(),
            "rate limit checked"
        );

        if count > action.max_requests() as i64 {
            return Err(RateLimitError::TooManyRequests {
                limit: action.max_requests(),
                window_seconds: action.window_seconds(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::errors::DomainError;
    use crate::repositories::InMemoryCache;

    fn limiter() -> RateLimiter<InMemoryCache> {
        RateLimiter::new(Arc::new(InMemoryCache::new()))
    }

    #[tokio::test]
    async fn test_allows_up_to_the_limit() {
        let limiter = limiter();
        for _ in 0..5 {
            limiter
                .check_and_consume(RateLimitAction::EstimateSubmit, "10.0.0.1")
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_rejects_past_the_limit() {
        let limiter = limiter();
        for _ in 0..5 {
            limiter
                .check_and_consume(RateLimitAction::EstimateSubmit, "10.0.0.1")
                .await
                .unwrap();
        }

        let result = limiter
            .check_and_consume(RateLimitAction::EstimateSubmit, "10.0.0.1")
            .await;
        assert!(matches!(
            result,
            Err(DomainError::RateLimit(RateLimitError::TooManyRequests {
                limit: 5,
                window_seconds: 1800,
            }))
        ));
    }

    #[tokio::test]
    async fn test_subjects_do_not_share_budgets() {
        let limiter = limiter();
        for _ in 0..5 {
            limiter
                .check_and_consume(RateLimitAction::QuestionSubmit, "10.0.0.1")
                .await
                .unwrap();
        }

        limiter
            .check_and_consume(RateLimitAction::QuestionSubmit, "10.0.0.2")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_actions_do_not_share_budgets() {
        let limiter = limiter();
        for _ in 0..5 {
            limiter
                .check_and_consume(RateLimitAction::EstimateSubmit, "10.0.0.1")
                .await
                .unwrap();
        }

        limiter
            .check_and_consume(RateLimitAction::ClientRequest, "10.0.0.1")
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expiry_resets_the_budget() {
        let limiter = limiter();
        for _ in 0..5 {
            limiter
                .check_and_consume(RateLimitAction::EstimateSubmit, "10.0.0.1")
                .await
                .unwrap();
        }
        assert!(limiter
            .check_and_consume(RateLimitAction::EstimateSubmit, "10.0.0.1")
            .await
            .is_err());

        tokio::time::advance(Duration::from_secs(1801)).await;

        limiter
            .check_and_consume(RateLimitAction::EstimateSubmit, "10.0.0.1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_client_request_budget() {
        let limiter = limiter();
        for _ in 0..30 {
            limiter
                .check_and_consume(RateLimitAction::ClientRequest, "10.0.0.9")
                .await
                .unwrap();
        }
        assert!(limiter
            .check_and_consume(RateLimitAction::ClientRequest, "10.0.0.9")
            .await
            .is_err());
    }
}
