//! Signed credential payload and the token pair handed to clients.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CredentialError, DomainResult};

/// Role carried by session credentials
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Role carried by channel-verification credentials
pub const ROLE_AUTH: &str = "ROLE_AUTH";

/// Claims structure for the JWT payload
///
/// `sub` and every entry in `sealed` hold ciphertext on the wire; the codec
/// decrypts them before handing claims to callers. `roles` stays plaintext
/// so a gateway can route on it without the cipher key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account or verification identifier)
    pub sub: String,

    /// Granted roles, plaintext
    pub roles: Vec<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique per issued credential)
    pub jti: String,

    /// Additional claims, each value individually encrypted
    #[serde(flatten)]
    pub sealed: BTreeMap<String, String>,
}

impl Claims {
    /// Creates new claims expiring `ttl_seconds` from now
    pub fn new(sub: impl Into<String>, roles: Vec<String>, ttl_seconds: i64, issuer: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(ttl_seconds);

        Self {
            sub: sub.into(),
            roles,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.into(),
            jti: Uuid::new_v4().to_string(),
            sealed: BTreeMap::new(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Checks whether a role was granted
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Gets the account identifier from the subject
    ///
    /// Only meaningful after the codec has decrypted the subject.
    pub fn account_id(&self) -> DomainResult<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| CredentialError::ValidationFailed.into())
    }

    /// Looks up an additional claim by name
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.sealed.get(name).map(String::as_str)
    }

    /// Looks up an additional claim, failing when absent
    pub fn require_claim(&self, name: &str) -> DomainResult<&str> {
        self.claim(name).ok_or_else(|| {
            CredentialError::MissingClaim {
                claim: name.to_string(),
            }
            .into()
        })
    }
}

/// Access/refresh pair returned to the client after sign-in or rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl SessionTokens {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}
