//! Mock implementation of VerificationRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::verification::Verification;
use crate::errors::DomainError;

use super::r#trait::VerificationRepository;

/// Mock verification repository for testing
pub struct MockVerificationRepository {
    verifications: Arc<RwLock<HashMap<i64, Verification>>>,
    next_id: AtomicI64,
}

impl MockVerificationRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            verifications: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seeds a verification row, standing in for the delivery collaborator
    pub async fn seed(&self, mut verification: Verification) -> Verification {
        let mut verifications = self.verifications.write().await;
        verification.verification_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        verifications.insert(verification.verification_id, verification.clone());
        verification
    }
}

impl Default for MockVerificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationRepository for MockVerificationRepository {
    async fn find_by_id(&self, verification_id: i64) -> Result<Option<Verification>, DomainError> {
        let verifications = self.verifications.read().await;
        Ok(verifications.get(&verification_id).cloned())
    }
}
