//! Payload types stored behind opaque token keys
//!
//! Each payload knows how to seal (encrypt) and open (decrypt) its own
//! sensitive fields, so the store never needs to know which fields matter.
//! Identifiers are kept as strings because ciphertext replaces them in the
//! sealed form.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::services::cipher::ClaimCipher;

/// A value that can live behind an opaque token key
///
/// `seal` and `open` return transformed copies; the store applies `seal`
/// before serializing and `open` after deserializing.
pub trait TokenPayload: Serialize + DeserializeOwned + Send + Sync {
    /// Returns a copy with every sensitive field encrypted
    fn seal(&self, cipher: &ClaimCipher) -> DomainResult<Self>;

    /// Returns a copy with every sensitive field decrypted
    fn open(&self, cipher: &ClaimCipher) -> DomainResult<Self>;
}

fn parse_id(value: &str) -> DomainResult<i64> {
    value.parse::<i64>().map_err(|_| DomainError::Internal {
        message: format!("Corrupt token payload identifier: {value}"),
    })
}

/// Proof that a phone or email ownership check succeeded
///
/// Minted after the code-compare step; consumed by channel sign-in, signup
/// and password-reset flows. The purpose (phone vs email) is carried by the
/// storage prefix, not the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationPayload {
    /// Verification record identifier, stringly typed because it is
    /// ciphertext in the sealed form
    pub verification_id: String,

    /// The phone number or email address that was verified
    pub recipient: String,
}

impl VerificationPayload {
    pub fn new(verification_id: i64, recipient: impl Into<String>) -> Self {
        Self {
            verification_id: verification_id.to_string(),
            recipient: recipient.into(),
        }
    }

    /// Numeric verification record id (opened payloads only)
    pub fn verification_id(&self) -> DomainResult<i64> {
        parse_id(&self.verification_id)
    }

    /// Compares the stored recipient against a submitted one
    pub fn matches_recipient(&self, recipient: &str) -> bool {
        self.recipient == recipient
    }
}

impl TokenPayload for VerificationPayload {
    fn seal(&self, cipher: &ClaimCipher) -> DomainResult<Self> {
        Ok(Self {
            verification_id: cipher.encrypt(&self.verification_id)?,
            recipient: cipher.encrypt(&self.recipient)?,
        })
    }

    fn open(&self, cipher: &ClaimCipher) -> DomainResult<Self> {
        Ok(Self {
            verification_id: cipher.decrypt(&self.verification_id)?,
            recipient: cipher.decrypt(&self.recipient)?,
        })
    }
}

/// First-phase signup form, parked until the phone check completes
///
/// Carries the raw password; sealing keeps it ciphertext at rest for the
/// ten minutes the token lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupPayload {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
}

impl SignupPayload {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            phone: phone.into(),
        }
    }
}

impl TokenPayload for SignupPayload {
    fn seal(&self, cipher: &ClaimCipher) -> DomainResult<Self> {
        Ok(Self {
            email: cipher.encrypt(&self.email)?,
            password: cipher.encrypt(&self.password)?,
            name: cipher.encrypt(&self.name)?,
            phone: cipher.encrypt(&self.phone)?,
        })
    }

    fn open(&self, cipher: &ClaimCipher) -> DomainResult<Self> {
        Ok(Self {
            email: cipher.decrypt(&self.email)?,
            password: cipher.decrypt(&self.password)?,
            name: cipher.decrypt(&self.name)?,
            phone: cipher.decrypt(&self.phone)?,
        })
    }
}

/// Find-password flow: identity already proven, waiting for the new password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetPayload {
    pub account_id: String,
    pub email: String,
}

impl PasswordResetPayload {
    pub fn new(account_id: i64, email: impl Into<String>) -> Self {
        Self {
            account_id: account_id.to_string(),
            email: email.into(),
        }
    }

    /// Numeric account id (opened payloads only)
    pub fn account_id(&self) -> DomainResult<i64> {
        parse_id(&self.account_id)
    }

    /// Compares the stored email against a submitted one
    pub fn matches_email(&self, email: &str) -> bool {
        self.email == email
    }
}

impl TokenPayload for PasswordResetPayload {
    fn seal(&self, cipher: &ClaimCipher) -> DomainResult<Self> {
        Ok(Self {
            account_id: cipher.encrypt(&self.account_id)?,
            email: cipher.encrypt(&self.email)?,
        })
    }

    fn open(&self, cipher: &ClaimCipher) -> DomainResult<Self> {
        Ok(Self {
            account_id: cipher.decrypt(&self.account_id)?,
            email: cipher.decrypt(&self.email)?,
        })
    }
}

/// Sensitive-action gate: the holder re-entered their password recently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordConfirmPayload {
    pub account_id: String,
    pub email: String,
}

impl PasswordConfirmPayload {
    pub fn new(account_id: i64, email: impl Into<String>) -> Self {
        Self {
            account_id: account_id.to_string(),
            email: email.into(),
        }
    }

    /// Numeric account id (opened payloads only)
    pub fn account_id(&self) -> DomainResult<i64> {
        parse_id(&self.account_id)
    }
}

impl TokenPayload for PasswordConfirmPayload {
    fn seal(&self, cipher: &ClaimCipher) -> DomainResult<Self> {
        Ok(Self {
            account_id: cipher.encrypt(&self.account_id)?,
            email: cipher.encrypt(&self.email)?,
        })
    }

    fn open(&self, cipher: &ClaimCipher) -> DomainResult<Self> {
        Ok(Self {
            account_id: cipher.decrypt(&self.account_id)?,
            email: cipher.decrypt(&self.email)?,
        })
    }
}
