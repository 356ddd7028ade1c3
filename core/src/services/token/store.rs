//! Token store over the key-value cache port

use std::sync::Arc;

use sp_shared::masking::mask_token;
use tracing::debug;
use uuid::Uuid;

use crate::domain::value_objects::{BlacklistReason, TokenPurpose};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::KeyValueCache;
use crate::services::cipher::ClaimCipher;

use super::payload::TokenPayload;

/// Purpose-segregated store for opaque tokens
///
/// Every entry lives under `purpose prefix + key` with the purpose's fixed
/// TTL, so a token minted for one flow can never be presented to another.
/// Payload fields are sealed through the claim cipher before they touch the
/// backing store.
pub struct TokenStore<C: KeyValueCache> {
    cache: Arc<C>,
    cipher: Arc<ClaimCipher>,
}

impl<C: KeyValueCache> TokenStore<C> {
    pub fn new(cache: Arc<C>, cipher: Arc<ClaimCipher>) -> Self {
        Self { cache, cipher }
    }

    /// Mints a new opaque token holding `payload`
    ///
    /// Seals the payload, serializes it and stores it under a random UUID
    /// key with the purpose TTL. Returns the bare key (without prefix);
    /// that is the string handed to the client.
    ///
    /// # Errors
    ///
    /// * `TokenError::StoreWriteFailed` - Serialization or backend write failed
    pub async fn create<P: TokenPayload>(
        &self,
        purpose: TokenPurpose,
        payload: &P,
    ) -> DomainResult<String> {
        let ttl = purpose
            .ttl_seconds()
            .ok_or_else(|| TokenError::StoreWriteFailed {
                message: format!("Purpose {:?} has no fixed lifetime", purpose),
            })?;

        let sealed = payload.seal(&self.cipher)?;
        let json = serde_json::to_string(&sealed).map_err(|e| TokenError::StoreWriteFailed {
            message: format!("Payload serialization failed: {e}"),
        })?;

        let key = Uuid::new_v4().to_string();
        self.cache
            .set_with_expiry(&purpose.storage_key(&key), &json, ttl)
            .await
            .map_err(|e| TokenError::StoreWriteFailed {
                message: e.to_string(),
            })?;

        debug!(purpose = ?purpose, key = %mask_token(&key), "Token created");
        Ok(key)
    }

    /// Reads a token's payload without consuming it
    ///
    /// Flows that must validate before committing call this, then `delete`
    /// once the rest of the work succeeded. The read and the delete are
    /// deliberately two steps, not one atomic operation.
    ///
    /// # Errors
    ///
    /// * `TokenError::IllegalToken` - Key is blank
    /// * `TokenError::NoSuchToken` - No live entry (missing or expired)
    /// * `TokenError::StoreReadFailed` - Backend read or payload decode failed
    pub async fn peek<P: TokenPayload>(
        &self,
        purpose: TokenPurpose,
        key: &str,
    ) -> DomainResult<P> {
        if key.trim().is_empty() {
            return Err(TokenError::IllegalToken.into());
        }

        let json = self
            .cache
            .get(&purpose.storage_key(key))
            .await
            .map_err(|e| TokenError::StoreReadFailed {
                message: e.to_string(),
            })?
            .ok_or(TokenError::NoSuchToken)?;

        let sealed: P = serde_json::from_str(&json).map_err(|e| TokenError::StoreReadFailed {
            message: format!("Payload decode failed: {e}"),
        })?;
        sealed.open(&self.cipher)
    }

    /// Reads and deletes in one call (single-use consumption)
    pub async fn take<P: TokenPayload>(
        &self,
        purpose: TokenPurpose,
        key: &str,
    ) -> DomainResult<P> {
        let payload = self.peek(purpose, key).await?;
        self.delete(purpose, key).await?;
        Ok(payload)
    }

    /// Removes a token; `false` when nothing was stored under the key
    pub async fn delete(&self, purpose: TokenPurpose, key: &str) -> DomainResult<bool> {
        let removed = self
            .cache
            .delete(&purpose.storage_key(key))
            .await
            .map_err(|e| TokenError::StoreWriteFailed {
                message: e.to_string(),
            })?;
        debug!(purpose = ?purpose, key = %mask_token(key), removed, "Token deleted");
        Ok(removed)
    }

    /// Checks whether a live entry exists under the key
    pub async fn exists(&self, purpose: TokenPurpose, key: &str) -> DomainResult<bool> {
        self.cache
            .exists(&purpose.storage_key(key))
            .await
            .map_err(|e| {
                TokenError::StoreReadFailed {
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Registers an account's refresh credential
    ///
    /// One live entry per account: re-registering overwrites, which is how
    /// rotation invalidates the previous refresh token.
    pub async fn register_refresh(
        &self,
        account_id: i64,
        refresh_token: &str,
    ) -> DomainResult<()> {
        let purpose = TokenPurpose::SessionRefresh;
        // SessionRefresh always carries a fixed lifetime
        let ttl = purpose.ttl_seconds().unwrap_or(0);

        self.cache
            .set_with_expiry(&purpose.storage_key(&account_id.to_string()), refresh_token, ttl)
            .await
            .map_err(|e| TokenError::StoreWriteFailed {
                message: e.to_string(),
            })?;

        debug!(account_id, "Refresh credential registered");
        Ok(())
    }

    /// Validates a presented refresh credential against the registry
    ///
    /// # Errors
    ///
    /// * `TokenError::NoSuchToken` - No registered entry for the account
    /// * `TokenError::ValueMismatch` - Registered value differs (rotated or stolen)
    pub async fn validate_refresh(
        &self,
        account_id: i64,
        refresh_token: &str,
    ) -> DomainResult<()> {
        let key = TokenPurpose::SessionRefresh.storage_key(&account_id.to_string());
        let stored = self
            .cache
            .get(&key)
            .await
            .map_err(|e| TokenError::StoreReadFailed {
                message: e.to_string(),
            })?
            .ok_or(TokenError::NoSuchToken)?;

        if stored != refresh_token {
            return Err(TokenError::ValueMismatch.into());
        }
        Ok(())
    }

    /// Drops an account's registered refresh credential
    pub async fn remove_refresh(&self, account_id: i64) -> DomainResult<bool> {
        let key = TokenPurpose::SessionRefresh.storage_key(&account_id.to_string());
        self.cache.delete(&key).await.map_err(|e| {
            TokenError::StoreWriteFailed {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Blacklists an access credential for the rest of its life
    ///
    /// The entry is keyed by the token value itself and carries the reason,
    /// so the session guard can tell a signed-out credential from one that
    /// merely needs a transparent refresh.
    pub async fn blacklist(
        &self,
        token: &str,
        ttl_seconds: u64,
        reason: BlacklistReason,
    ) -> DomainResult<()> {
        self.cache
            .set_with_expiry(
                &TokenPurpose::AccessBlacklist.storage_key(token),
                reason.as_str(),
                ttl_seconds,
            )
            .await
            .map_err(|e| TokenError::StoreWriteFailed {
                message: e.to_string(),
            })?;

        debug!(
            token = %mask_token(token),
            reason = reason.as_str(),
            ttl_seconds,
            "Access credential blacklisted"
        );
        Ok(())
    }

    /// Reads why a credential was blacklisted, if it is
    ///
    /// `Ok(None)` means not blacklisted. An unparseable stored reason is
    /// treated as `SignOut` (the strict interpretation).
    pub async fn blacklist_reason(&self, token: &str) -> DomainResult<Option<BlacklistReason>> {
        let value = self
            .cache
            .get(&TokenPurpose::AccessBlacklist.storage_key(token))
            .await
            .map_err(|e| TokenError::StoreReadFailed {
                message: e.to_string(),
            })?;

        Ok(value.map(|v| BlacklistReason::parse(&v).unwrap_or(BlacklistReason::SignOut)))
    }

    /// Removes a blacklist entry (after a forced refresh resolved it)
    pub async fn remove_blacklist(&self, token: &str) -> DomainResult<bool> {
        self.cache
            .delete(&TokenPurpose::AccessBlacklist.storage_key(token))
            .await
            .map_err(|e| {
                TokenError::StoreWriteFailed {
                    message: e.to_string(),
                }
                .into()
            })
    }
}
