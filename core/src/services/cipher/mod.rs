//! Claim value encryption using AES-256-GCM.
//!
//! Credentials leave the server signed but readable; every non-structural
//! claim value is therefore encrypted individually before signing. Roles
//! stay plaintext so gateways can route without the key.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};

use crate::errors::{CipherError, DomainResult};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// AES-256-GCM cipher for individual claim values
///
/// Output format: `base64(nonce || ciphertext)`. A fresh random nonce per
/// call means equal plaintexts never produce equal ciphertexts.
pub struct ClaimCipher {
    key: [u8; KEY_LEN],
}

impl ClaimCipher {
    /// Create a cipher from a base64-encoded 32-byte key
    pub fn new(key_base64: &str) -> DomainResult<Self> {
        let key_bytes = BASE64
            .decode(key_base64)
            .map_err(|_| CipherError::InvalidKey)?;
        let key: [u8; KEY_LEN] = key_bytes
            .try_into()
            .map_err(|_| CipherError::InvalidKey)?;
        Ok(Self { key })
    }

    /// Create a cipher from raw key bytes (for testing)
    pub fn from_bytes(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Generate a random nonce for AES-GCM
    fn generate_nonce() -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }

    /// Encrypt a claim value
    pub fn encrypt(&self, plaintext: &str) -> DomainResult<String> {
        let key = Key::<Aes256Gcm>::from_slice(&self.key);
        let cipher = Aes256Gcm::new(key);

        let nonce_bytes = Self::generate_nonce();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptFailed)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(combined))
    }

    /// Decrypt a claim value produced by `encrypt`
    pub fn decrypt(&self, sealed: &str) -> DomainResult<String> {
        let combined = BASE64.decode(sealed).map_err(|_| CipherError::Malformed)?;
        if combined.len() <= NONCE_LEN {
            return Err(CipherError::Malformed.into());
        }
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);

        let key = Key::<Aes256Gcm>::from_slice(&self.key);
        let cipher = Aes256Gcm::new(key);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CipherError::DecryptFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::DecryptFailed.into())
    }

    /// Decrypt and compare against an expected value in constant time
    pub fn matches(&self, sealed: &str, expected: &str) -> DomainResult<bool> {
        let plaintext = self.decrypt(sealed)?;
        let plain_bytes = plaintext.as_bytes();
        let expected_bytes = expected.as_bytes();
        if plain_bytes.len() != expected_bytes.len() {
            return Ok(false);
        }
        Ok(constant_time_eq(plain_bytes, expected_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> ClaimCipher {
        ClaimCipher::from_bytes([7u8; 32])
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let cipher = cipher();
        let sealed = cipher.encrypt("42").unwrap();
        assert_ne!(sealed, "42");
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "42");
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let cipher = cipher();
        let a = cipher.encrypt("same value").unwrap();
        let b = cipher.encrypt("same value").unwrap();
        assert_ne!(a, b);
        assert_eq!(cipher.decrypt(&a).unwrap(), cipher.decrypt(&b).unwrap());
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let cipher = cipher();
        let sealed = cipher.encrypt("payload").unwrap();
        let mut bytes = BASE64.decode(&sealed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64.encode(bytes);
        assert!(cipher.decrypt(&tampered).is_err());
    }

    #[test]
    fn test_malformed_inputs() {
        let cipher = cipher();
        assert!(cipher.decrypt("not base64!!!").is_err());
        assert!(cipher.decrypt("").is_err());
        // Valid base64 but shorter than a nonce
        assert!(cipher.decrypt(&BASE64.encode([1u8; 8])).is_err());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = cipher().encrypt("secret").unwrap();
        let other = ClaimCipher::from_bytes([8u8; 32]);
        assert!(other.decrypt(&sealed).is_err());
    }

    #[test]
    fn test_matches() {
        let cipher = cipher();
        let sealed = cipher.encrypt("user@spotless.kr").unwrap();
        assert!(cipher.matches(&sealed, "user@spotless.kr").unwrap());
        assert!(!cipher.matches(&sealed, "other@spotless.kr").unwrap());
        assert!(!cipher.matches(&sealed, "short").unwrap());
    }

    #[test]
    fn test_key_from_base64() {
        let key_b64 = BASE64.encode([9u8; 32]);
        let cipher = ClaimCipher::new(&key_b64).unwrap();
        let sealed = cipher.encrypt("x").unwrap();
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "x");
    }

    #[test]
    fn test_invalid_keys_rejected() {
        assert!(ClaimCipher::new("short").is_err());
        assert!(ClaimCipher::new(&BASE64.encode([1u8; 16])).is_err());
        assert!(ClaimCipher::new("***").is_err());
    }
}
