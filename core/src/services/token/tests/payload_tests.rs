//! Unit tests for token payload sealing

use crate::services::cipher::ClaimCipher;
use crate::services::token::{
    PasswordResetPayload, SignupPayload, TokenPayload, VerificationPayload,
};

fn cipher() -> ClaimCipher {
    ClaimCipher::from_bytes([7u8; 32])
}

#[test]
fn test_verification_payload_seal_round_trip() {
    let cipher = cipher();
    let payload = VerificationPayload::new(42, "01012345678");

    let sealed = payload.seal(&cipher).unwrap();
    assert_ne!(sealed.verification_id, payload.verification_id);
    assert_ne!(sealed.recipient, payload.recipient);

    let opened = sealed.open(&cipher).unwrap();
    assert_eq!(opened, payload);
    assert_eq!(opened.verification_id().unwrap(), 42);
    assert!(opened.matches_recipient("01012345678"));
    assert!(!opened.matches_recipient("01000000000"));
}

#[test]
fn test_signup_payload_seals_every_field() {
    let cipher = cipher();
    let payload = SignupPayload::new("new@spotless.kr", "hunter2!A", "Kim", "01012345678");

    let sealed = payload.seal(&cipher).unwrap();
    assert_ne!(sealed.email, payload.email);
    assert_ne!(sealed.password, payload.password);
    assert_ne!(sealed.name, payload.name);
    assert_ne!(sealed.phone, payload.phone);

    assert_eq!(sealed.open(&cipher).unwrap(), payload);
}

#[test]
fn test_open_with_wrong_key_fails() {
    let sealed = PasswordResetPayload::new(7, "a@b.c").seal(&cipher()).unwrap();
    let other = ClaimCipher::from_bytes([8u8; 32]);
    assert!(sealed.open(&other).is_err());
}

#[test]
fn test_corrupt_identifier_is_rejected() {
    let payload = VerificationPayload {
        verification_id: "not-a-number".to_string(),
        recipient: "a@b.c".to_string(),
    };
    assert!(payload.verification_id().is_err());
}
