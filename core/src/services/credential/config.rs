//! Configuration for the credential codec

use sp_shared::CredentialConfig;

/// Signing and lifetime knobs for the credential codec
///
/// Three independent HMAC secrets, one per credential kind: leaking the
/// access secret does not let an attacker forge refresh or verification
/// credentials.
#[derive(Debug, Clone)]
pub struct CredentialCodecConfig {
    /// HMAC secret for access credentials
    pub access_secret: String,
    /// HMAC secret for refresh credentials
    pub refresh_secret: String,
    /// HMAC secret for channel-verification credentials
    pub verification_secret: String,
    /// Base64-encoded 32-byte AES key for claim values
    pub claim_cipher_key: String,
    /// Issuer claim stamped into every credential
    pub issuer: String,
    /// Access credential lifetime in seconds
    pub access_ttl_seconds: i64,
    /// Refresh credential lifetime in seconds
    pub refresh_ttl_seconds: i64,
    /// Channel-verification credential lifetime in seconds
    pub verification_ttl_seconds: i64,
}

impl Default for CredentialCodecConfig {
    fn default() -> Self {
        Self::from(&CredentialConfig::default())
    }
}

impl From<&CredentialConfig> for CredentialCodecConfig {
    fn from(config: &CredentialConfig) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            verification_secret: config.verification_secret.clone(),
            claim_cipher_key: config.claim_cipher_key.clone(),
            issuer: config.issuer.clone(),
            access_ttl_seconds: config.access_token_expiry,
            refresh_ttl_seconds: config.refresh_token_expiry,
            verification_ttl_seconds: config.verification_token_expiry,
        }
    }
}
