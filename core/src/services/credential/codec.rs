//! JWT encode/decode for the three credential kinds

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::domain::value_objects::{Claims, SessionTokens, ROLE_AUTH};
use crate::errors::{CredentialError, DomainResult};
use crate::services::cipher::ClaimCipher;

use super::config::CredentialCodecConfig;

/// Which secret a credential was signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Access,
    Refresh,
    Verification,
}

/// Encoding and decoding keys derived from one secret
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and validates the signed credentials of the session subsystem
///
/// Validation failures collapse into two cases only: an expired credential
/// reports [`CredentialError::TimedOut`], every other structural or
/// signature problem reports [`CredentialError::ValidationFailed`]. Callers
/// never learn which check rejected a forged credential.
pub struct CredentialCodec {
    access: KeyPair,
    refresh: KeyPair,
    verification: KeyPair,
    cipher: Arc<ClaimCipher>,
    config: CredentialCodecConfig,
}

impl CredentialCodec {
    /// Creates a codec from configuration and a shared claim cipher
    pub fn new(config: CredentialCodecConfig, cipher: Arc<ClaimCipher>) -> Self {
        Self {
            access: KeyPair::from_secret(&config.access_secret),
            refresh: KeyPair::from_secret(&config.refresh_secret),
            verification: KeyPair::from_secret(&config.verification_secret),
            cipher,
            config,
        }
    }

    /// Issues an access/refresh pair for an account
    ///
    /// The access credential carries the sealed account id as subject plus
    /// every extra claim sealed individually; the refresh credential carries
    /// the sealed subject only. The two subjects are encrypted separately,
    /// so the credentials share no ciphertext.
    pub fn issue_session(
        &self,
        account_id: i64,
        roles: Vec<String>,
        extra_claims: &[(&str, &str)],
    ) -> DomainResult<SessionTokens> {
        let subject = account_id.to_string();

        let mut access = Claims::new(
            self.cipher.encrypt(&subject)?,
            roles,
            self.config.access_ttl_seconds,
            &self.config.issuer,
        );
        for (name, value) in extra_claims {
            access
                .sealed
                .insert((*name).to_string(), self.cipher.encrypt(value)?);
        }
        let access_token = self.encode(&access, &self.access)?;

        let refresh = Claims::new(
            self.cipher.encrypt(&subject)?,
            Vec::new(),
            self.config.refresh_ttl_seconds,
            &self.config.issuer,
        );
        let refresh_token = self.encode(&refresh, &self.refresh)?;

        Ok(SessionTokens::new(
            access_token,
            refresh_token,
            self.config.access_ttl_seconds,
            self.config.refresh_ttl_seconds,
        ))
    }

    /// Issues a channel-verification credential
    ///
    /// Subject is the sealed verification id; the recipient travels as a
    /// sealed extra claim. Carries [`ROLE_AUTH`] so guarded account flows
    /// can accept it without granting a full session.
    pub fn issue_verification(&self, verification_id: i64, recipient: &str) -> DomainResult<String> {
        let mut claims = Claims::new(
            self.cipher.encrypt(&verification_id.to_string())?,
            vec![ROLE_AUTH.to_string()],
            self.config.verification_ttl_seconds,
            &self.config.issuer,
        );
        claims
            .sealed
            .insert("recipient".to_string(), self.cipher.encrypt(recipient)?);
        self.encode(&claims, &self.verification)
    }

    /// Validates an access credential and returns its decrypted claims
    pub fn validate_access(&self, token: &str) -> DomainResult<Claims> {
        let claims = self.decode(token, &self.access, true)?;
        self.unseal(claims)
    }

    /// Validates a channel-verification credential and returns its decrypted claims
    pub fn validate_verification(&self, token: &str) -> DomainResult<Claims> {
        let claims = self.decode(token, &self.verification, true)?;
        self.unseal(claims)
    }

    /// Validates a refresh credential and returns the account id it names
    pub fn validate_refresh(&self, token: &str) -> DomainResult<i64> {
        let claims = self.decode(token, &self.refresh, true)?;
        self.unseal(claims)?.account_id()
    }

    /// Time left until a credential expires
    ///
    /// Decodes without the expiry check so an already-expired credential is
    /// still parsed; it then reports [`CredentialError::TimedOut`]. Used to
    /// size blacklist entries to the credential's remaining life.
    pub fn remaining_life(&self, kind: CredentialKind, token: &str) -> DomainResult<Duration> {
        let keys = match kind {
            CredentialKind::Access => &self.access,
            CredentialKind::Refresh => &self.refresh,
            CredentialKind::Verification => &self.verification,
        };
        let claims = self.decode(token, keys, false)?;

        let remaining = claims.exp - Utc::now().timestamp();
        if remaining <= 0 {
            return Err(CredentialError::TimedOut.into());
        }
        Ok(Duration::seconds(remaining))
    }

    fn encode(&self, claims: &Claims, keys: &KeyPair) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)
            .map_err(|_| CredentialError::BuildFailed.into())
    }

    fn decode(&self, token: &str, keys: &KeyPair, check_expiry: bool) -> DomainResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        // Expiry is exact; the default 60s leeway would keep dead
        // credentials usable.
        validation.leeway = 0;
        validation.validate_exp = check_expiry;

        let data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::TimedOut,
                _ => CredentialError::ValidationFailed,
            }
        })?;
        Ok(data.claims)
    }

    /// Decrypts the subject and every sealed claim value in place
    fn unseal(&self, mut claims: Claims) -> DomainResult<Claims> {
        claims.sub = self
            .cipher
            .decrypt(&claims.sub)
            .map_err(|_| CredentialError::ValidationFailed)?;
        for value in claims.sealed.values_mut() {
            *value = self
                .cipher
                .decrypt(value)
                .map_err(|_| CredentialError::ValidationFailed)?;
        }
        Ok(claims)
    }
}
