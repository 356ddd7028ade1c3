//! Key-value cache interface.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Interface for the expiring key-value store
///
/// Backed by Redis in production and by an in-memory map in tests. Each
/// operation is atomic per key; implementations report backend failures as
/// `DomainError::Internal`.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Stores a value with a time-to-live
    ///
    /// # Arguments
    ///
    /// * `key` - Full storage key
    /// * `value` - Value to store
    /// * `ttl_seconds` - Lifetime after which the entry disappears
    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), DomainError>;

    /// Fetches a value
    ///
    /// # Returns
    ///
    /// `Ok(Some(value))` while the entry is live, `Ok(None)` once missing
    /// or expired
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Removes an entry
    ///
    /// # Returns
    ///
    /// `Ok(true)` when an entry was removed, `Ok(false)` when none existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Checks whether a live entry exists
    async fn exists(&self, key: &str) -> Result<bool, DomainError>;

    /// Atomically increments a counter, creating it at 1
    ///
    /// A newly created counter has no expiry until `expire` is called.
    ///
    /// # Returns
    ///
    /// The counter value after the increment
    async fn increment(&self, key: &str) -> Result<i64, DomainError>;

    /// Sets the time-to-live of an existing entry
    ///
    /// # Returns
    ///
    /// `Ok(true)` when the entry existed, `Ok(false)` otherwise
    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool, DomainError>;

    /// Remaining lifetime of an entry in seconds
    ///
    /// # Returns
    ///
    /// `Ok(Some(seconds))` for live entries with an expiry, `Ok(None)` for
    /// missing entries or entries without one
    async fn ttl(&self, key: &str) -> Result<Option<u64>, DomainError>;
}
