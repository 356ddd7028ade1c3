//! Credential configuration
//!
//! Secrets and lifetimes for the three JWT purposes (access, refresh,
//! channel verification) and the AES key used to encrypt claim values.
//! Each purpose signs with its own secret so a token can never be replayed
//! against a different validator.

use serde::{Deserialize, Serialize};

const DEFAULT_ACCESS_SECRET: &str = "dev-access-secret-change-in-production";
const DEFAULT_REFRESH_SECRET: &str = "dev-refresh-secret-change-in-production";
const DEFAULT_VERIFICATION_SECRET: &str = "dev-verification-secret-change-in-production";
// base64 of 32 zero bytes, development only
const DEFAULT_CLAIM_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// Credential signing and encryption configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialConfig {
    /// HMAC secret for access tokens
    pub access_secret: String,

    /// HMAC secret for refresh tokens
    pub refresh_secret: String,

    /// HMAC secret for channel-verification tokens
    pub verification_secret: String,

    /// Base64-encoded 32-byte AES key for claim value encryption
    pub claim_cipher_key: String,

    /// JWT issuer claim
    pub issuer: String,

    /// Access token expiry in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry in seconds
    pub refresh_token_expiry: i64,

    /// Channel-verification token expiry in seconds
    pub verification_token_expiry: i64,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            access_secret: String::from(DEFAULT_ACCESS_SECRET),
            refresh_secret: String::from(DEFAULT_REFRESH_SECRET),
            verification_secret: String::from(DEFAULT_VERIFICATION_SECRET),
            claim_cipher_key: String::from(DEFAULT_CLAIM_KEY),
            issuer: String::from("spotless"),
            access_token_expiry: 3600,        // 1 hour
            refresh_token_expiry: 1_209_600,  // 14 days
            verification_token_expiry: 1800,  // 30 minutes
        }
    }
}

impl CredentialConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let access_secret = std::env::var("CREDENTIAL_ACCESS_SECRET")
            .unwrap_or_else(|_| DEFAULT_ACCESS_SECRET.to_string());
        let refresh_secret = std::env::var("CREDENTIAL_REFRESH_SECRET")
            .unwrap_or_else(|_| DEFAULT_REFRESH_SECRET.to_string());
        let verification_secret = std::env::var("CREDENTIAL_VERIFICATION_SECRET")
            .unwrap_or_else(|_| DEFAULT_VERIFICATION_SECRET.to_string());
        let claim_cipher_key = std::env::var("CREDENTIAL_CLAIM_KEY")
            .unwrap_or_else(|_| DEFAULT_CLAIM_KEY.to_string());
        let issuer =
            std::env::var("CREDENTIAL_ISSUER").unwrap_or_else(|_| "spotless".to_string());

        Self {
            access_secret,
            refresh_secret,
            verification_secret,
            claim_cipher_key,
            issuer,
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set channel-verification token expiry in minutes
    pub fn with_verification_expiry_minutes(mut self, minutes: i64) -> Self {
        self.verification_token_expiry = minutes * 60;
        self
    }

    /// Check if any signing secret is still a development default (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.access_secret == DEFAULT_ACCESS_SECRET
            || self.refresh_secret == DEFAULT_REFRESH_SECRET
            || self.verification_secret == DEFAULT_VERIFICATION_SECRET
            || self.claim_cipher_key == DEFAULT_CLAIM_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_flags_dev_secrets() {
        let config = CredentialConfig::default();
        assert!(config.is_using_default_secret());
        assert_eq!(config.access_token_expiry, 3600);
        assert_eq!(config.refresh_token_expiry, 14 * 86400);
        assert_eq!(config.verification_token_expiry, 1800);
    }

    #[test]
    fn test_expiry_builders() {
        let config = CredentialConfig::default()
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(7)
            .with_verification_expiry_minutes(15);
        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 7 * 86400);
        assert_eq!(config.verification_token_expiry, 900);
    }

    #[test]
    fn test_custom_secrets_not_flagged() {
        let config = CredentialConfig {
            access_secret: "a".repeat(64),
            refresh_secret: "b".repeat(64),
            verification_secret: "c".repeat(64),
            claim_cipher_key: "q".repeat(43) + "=",
            ..Default::default()
        };
        assert!(!config.is_using_default_secret());
    }
}
