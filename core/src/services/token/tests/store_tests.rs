//! Unit tests for the token store over the in-memory cache

use std::sync::Arc;

use tokio::time::{advance, Duration};

use crate::domain::value_objects::{BlacklistReason, TokenPurpose};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemoryCache, KeyValueCache};
use crate::services::cipher::ClaimCipher;
use crate::services::token::{SignupPayload, TokenStore, VerificationPayload};

fn store() -> (TokenStore<InMemoryCache>, Arc<InMemoryCache>) {
    let cache = Arc::new(InMemoryCache::new());
    let cipher = Arc::new(ClaimCipher::from_bytes([7u8; 32]));
    (TokenStore::new(Arc::clone(&cache), cipher), cache)
}

#[tokio::test]
async fn test_create_and_peek_round_trip() {
    let (store, _) = store();
    let payload = VerificationPayload::new(42, "01012345678");

    let key = store
        .create(TokenPurpose::VerificationPhone, &payload)
        .await
        .unwrap();
    assert!(!key.contains(':'), "client key must not carry the prefix");

    let loaded: VerificationPayload = store
        .peek(TokenPurpose::VerificationPhone, &key)
        .await
        .unwrap();
    assert_eq!(loaded, payload);
}

#[tokio::test]
async fn test_stored_value_is_sealed() {
    let (store, cache) = store();
    let payload = SignupPayload::new("new@spotless.kr", "hunter2!A", "Kim", "01012345678");

    let key = store
        .create(TokenPurpose::SignupIntermediate, &payload)
        .await
        .unwrap();

    let raw = cache
        .get(&TokenPurpose::SignupIntermediate.storage_key(&key))
        .await
        .unwrap()
        .unwrap();
    assert!(!raw.contains("hunter2!A"));
    assert!(!raw.contains("new@spotless.kr"));
}

#[tokio::test]
async fn test_peek_blank_key_is_illegal() {
    let (store, _) = store();
    let result = store
        .peek::<VerificationPayload>(TokenPurpose::VerificationPhone, "  ")
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::IllegalToken))
    ));
}

#[tokio::test]
async fn test_peek_missing_key_is_not_found() {
    let (store, _) = store();
    let result = store
        .peek::<VerificationPayload>(TokenPurpose::VerificationPhone, "no-such-key")
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::NoSuchToken))
    ));
}

#[tokio::test]
async fn test_take_is_single_use() {
    let (store, _) = store();
    let payload = VerificationPayload::new(1, "a@b.c");
    let key = store
        .create(TokenPurpose::VerificationEmail, &payload)
        .await
        .unwrap();

    let first: VerificationPayload = store
        .take(TokenPurpose::VerificationEmail, &key)
        .await
        .unwrap();
    assert_eq!(first, payload);

    let second = store
        .take::<VerificationPayload>(TokenPurpose::VerificationEmail, &key)
        .await;
    assert!(matches!(
        second,
        Err(DomainError::Token(TokenError::NoSuchToken))
    ));
}

#[tokio::test]
async fn test_peek_does_not_consume() {
    let (store, _) = store();
    let payload = VerificationPayload::new(1, "a@b.c");
    let key = store
        .create(TokenPurpose::VerificationEmail, &payload)
        .await
        .unwrap();

    for _ in 0..2 {
        let loaded: VerificationPayload = store
            .peek(TokenPurpose::VerificationEmail, &key)
            .await
            .unwrap();
        assert_eq!(loaded, payload);
    }

    assert!(store.delete(TokenPurpose::VerificationEmail, &key).await.unwrap());
    assert!(!store.exists(TokenPurpose::VerificationEmail, &key).await.unwrap());
}

#[tokio::test]
async fn test_purposes_are_segregated() {
    let (store, _) = store();
    let payload = VerificationPayload::new(1, "01012345678");
    let key = store
        .create(TokenPurpose::VerificationPhone, &payload)
        .await
        .unwrap();

    let crossed = store
        .peek::<VerificationPayload>(TokenPurpose::VerificationEmail, &key)
        .await;
    assert!(matches!(
        crossed,
        Err(DomainError::Token(TokenError::NoSuchToken))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_entries_expire_with_purpose_ttl() {
    let (store, _) = store();
    let key = store
        .create(
            TokenPurpose::VerificationPhone,
            &VerificationPayload::new(1, "01012345678"),
        )
        .await
        .unwrap();

    advance(Duration::from_secs(299)).await;
    assert!(store.exists(TokenPurpose::VerificationPhone, &key).await.unwrap());

    advance(Duration::from_secs(2)).await;
    let result = store
        .peek::<VerificationPayload>(TokenPurpose::VerificationPhone, &key)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::NoSuchToken))
    ));
}

#[tokio::test]
async fn test_refresh_registry_overwrite_rotates() {
    let (store, _) = store();

    store.register_refresh(42, "refresh-v1").await.unwrap();
    store.validate_refresh(42, "refresh-v1").await.unwrap();

    // Rotation: new registration replaces the old value
    store.register_refresh(42, "refresh-v2").await.unwrap();
    store.validate_refresh(42, "refresh-v2").await.unwrap();

    let stale = store.validate_refresh(42, "refresh-v1").await;
    assert!(matches!(
        stale,
        Err(DomainError::Token(TokenError::ValueMismatch))
    ));
}

#[tokio::test]
async fn test_validate_refresh_unregistered_account() {
    let (store, _) = store();
    let result = store.validate_refresh(99, "anything").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::NoSuchToken))
    ));
}

#[tokio::test]
async fn test_remove_refresh() {
    let (store, _) = store();
    store.register_refresh(42, "refresh-v1").await.unwrap();

    assert!(store.remove_refresh(42).await.unwrap());
    assert!(!store.remove_refresh(42).await.unwrap());

    let result = store.validate_refresh(42, "refresh-v1").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::NoSuchToken))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_blacklist_reason_round_trip() {
    let (store, _) = store();

    store
        .blacklist("revoked-jwt", 120, BlacklistReason::SignOut)
        .await
        .unwrap();
    assert_eq!(
        store.blacklist_reason("revoked-jwt").await.unwrap(),
        Some(BlacklistReason::SignOut)
    );
    assert_eq!(store.blacklist_reason("other-jwt").await.unwrap(), None);

    // Entry outlives the credential by nothing: gone once the TTL passes
    advance(Duration::from_secs(121)).await;
    assert_eq!(store.blacklist_reason("revoked-jwt").await.unwrap(), None);
}

#[tokio::test]
async fn test_unknown_blacklist_value_reads_as_sign_out() {
    let (store, cache) = store();
    cache
        .set_with_expiry(
            &TokenPurpose::AccessBlacklist.storage_key("odd-jwt"),
            "LEGACY",
            60,
        )
        .await
        .unwrap();

    assert_eq!(
        store.blacklist_reason("odd-jwt").await.unwrap(),
        Some(BlacklistReason::SignOut)
    );
}

#[tokio::test]
async fn test_remove_blacklist() {
    let (store, _) = store();
    store
        .blacklist("revoked-jwt", 120, BlacklistReason::Update)
        .await
        .unwrap();

    assert!(store.remove_blacklist("revoked-jwt").await.unwrap());
    assert_eq!(store.blacklist_reason("revoked-jwt").await.unwrap(), None);
}
