//! Account repository interface.

use async_trait::async_trait;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

/// Repository interface for account persistence
///
/// Updates are version-guarded: the row is matched on both identifier and
/// the version the caller loaded, and the version is bumped on success. A
/// concurrent writer therefore surfaces as `DomainError::VersionConflict`
/// instead of silently overwriting.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by its identifier
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account identifier
    ///
    /// # Returns
    ///
    /// `Ok(Some(account))` when found, `Ok(None)` otherwise
    async fn find_by_id(&self, account_id: i64) -> Result<Option<Account>, DomainError>;

    /// Finds an account by its sign-in email
    ///
    /// # Arguments
    ///
    /// * `email` - The email address to look up
    ///
    /// # Returns
    ///
    /// `Ok(Some(account))` when found, `Ok(None)` otherwise
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Inserts a new account
    ///
    /// # Arguments
    ///
    /// * `account` - The account to persist (identifier is assigned here)
    ///
    /// # Returns
    ///
    /// The stored account with its assigned identifier, or
    /// `DomainError::Validation` when the email is already registered
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Saves changes to an existing account, guarded by its version
    ///
    /// # Arguments
    ///
    /// * `account` - The modified account carrying the version it was loaded at
    ///
    /// # Returns
    ///
    /// The stored account with its bumped version,
    /// `DomainError::VersionConflict` when another writer got there first,
    /// or `DomainError::NotFound` when the row no longer exists
    async fn update(&self, account: Account) -> Result<Account, DomainError>;

    /// Checks whether an email is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;
}
