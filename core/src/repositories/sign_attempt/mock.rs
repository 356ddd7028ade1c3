//! Mock implementation of SignAttemptRepository for testing

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::sign_attempt::SignAttempt;
use crate::errors::DomainError;

use super::r#trait::SignAttemptRepository;

/// Mock sign attempt repository for testing
pub struct MockSignAttemptRepository {
    attempts: Arc<RwLock<Vec<SignAttempt>>>,
    next_id: AtomicI64,
}

impl MockSignAttemptRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// All recorded attempts, for assertions
    pub async fn recorded(&self) -> Vec<SignAttempt> {
        self.attempts.read().await.clone()
    }
}

impl Default for MockSignAttemptRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignAttemptRepository for MockSignAttemptRepository {
    async fn insert(&self, mut attempt: SignAttempt) -> Result<SignAttempt, DomainError> {
        let mut attempts = self.attempts.write().await;
        attempt.attempt_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn count_unresolved_failures(&self, account_id: i64) -> Result<u32, DomainError> {
        let attempts = self.attempts.read().await;
        let count = attempts
            .iter()
            .filter(|a| a.account_id == Some(account_id) && a.is_unresolved_failure())
            .count();
        Ok(count as u32)
    }

    async fn insert_resolving(&self, mut attempt: SignAttempt) -> Result<SignAttempt, DomainError> {
        let account_id = attempt.account_id.ok_or_else(|| DomainError::Validation {
            message: "Resolving attempt must be attributed to an account".to_string(),
        })?;

        let mut attempts = self.attempts.write().await;
        attempt.attempt_id = self.next_id.fetch_add(1, Ordering::SeqCst);

        for prior in attempts.iter_mut() {
            if prior.account_id == Some(account_id) && prior.is_unresolved_failure() {
                prior.resolved_by = Some(attempt.attempt_id);
            }
        }

        attempts.push(attempt.clone());
        Ok(attempt)
    }
}
