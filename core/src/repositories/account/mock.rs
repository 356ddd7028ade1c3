//! Mock implementation of AccountRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

use super::r#trait::AccountRepository;

/// Mock account repository for testing
///
/// Mirrors the version-guard semantics of the MySQL implementation so
/// optimistic-concurrency paths can be tested without a database.
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<i64, Account>>>,
    next_id: AtomicI64,
}

impl MockAccountRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_id(&self, account_id: i64) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&account_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn create(&self, mut account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::Validation {
                message: "Email already registered".to_string(),
            });
        }

        account.account_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        account.version = 0;
        accounts.insert(account.account_id, account.clone());
        Ok(account)
    }

    async fn update(&self, mut account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        let current = accounts.get(&account.account_id).ok_or(DomainError::NotFound {
            resource: "Account".to_string(),
        })?;

        if current.version != account.version {
            return Err(DomainError::VersionConflict {
                submitted: account.version,
                current: current.version,
            });
        }

        account.version += 1;
        accounts.insert(account.account_id, account.clone());
        Ok(account)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().any(|a| a.email == email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::account::AccountStatus;

    fn account(email: &str) -> Account {
        Account::new(email, "$2b$12$hash", "name", "010-0000-0000")
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let repo = MockAccountRepository::new();
        let created = repo.create(account("a@spotless.kr")).await.unwrap();
        assert!(created.account_id > 0);

        let found = repo.find_by_id(created.account_id).await.unwrap();
        assert_eq!(found.unwrap().email, "a@spotless.kr");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = MockAccountRepository::new();
        repo.create(account("a@spotless.kr")).await.unwrap();
        let result = repo.create(account("a@spotless.kr")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let repo = MockAccountRepository::new();
        let mut created = repo.create(account("a@spotless.kr")).await.unwrap();

        created.suspend();
        let updated = repo.update(created).await.unwrap();
        assert_eq!(updated.version, 1);
        assert_eq!(updated.status, AccountStatus::Stay);
    }

    #[tokio::test]
    async fn test_stale_update_leaves_record_unchanged() {
        let repo = MockAccountRepository::new();
        let created = repo.create(account("a@spotless.kr")).await.unwrap();

        let mut first = created.clone();
        first.suspend();
        repo.update(first).await.unwrap();

        // Second writer still holds version 0
        let mut stale = created.clone();
        stale.mark_deleted();
        let result = repo.update(stale).await;
        assert!(matches!(result, Err(DomainError::VersionConflict { submitted: 0, current: 1 })));

        let current = repo.find_by_id(created.account_id).await.unwrap().unwrap();
        assert_eq!(current.status, AccountStatus::Stay);
        assert_eq!(current.version, 1);
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let repo = MockAccountRepository::new();
        let mut ghost = account("ghost@spotless.kr");
        ghost.account_id = 99;
        assert!(matches!(
            repo.update(ghost).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_exists_by_email() {
        let repo = MockAccountRepository::new();
        repo.create(account("a@spotless.kr")).await.unwrap();
        assert!(repo.exists_by_email("a@spotless.kr").await.unwrap());
        assert!(!repo.exists_by_email("b@spotless.kr").await.unwrap());
    }
}
