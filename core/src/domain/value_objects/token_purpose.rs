//! Token purpose registry.
//!
//! Every opaque token lives under a purpose-specific key prefix with a
//! purpose-specific lifetime. A token minted for one purpose can never be
//! presented for another because lookups always go through the prefix.

use serde::{Deserialize, Serialize};

/// Purpose of a stored token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Phone ownership confirmed, waiting to be consumed by a flow
    VerificationPhone,
    /// Email ownership confirmed, waiting to be consumed by a flow
    VerificationEmail,
    /// Two-phase signup: form accepted, waiting for final submit
    SignupIntermediate,
    /// Find-password flow: identity confirmed, waiting for the new password
    PasswordResetIntermediate,
    /// Sensitive-action gate: password re-entry confirmed
    PasswordConfirmIntermediate,
    /// Registered refresh credential, one per account
    SessionRefresh,
    /// Revoked access credential, kept until it would have expired anyway
    AccessBlacklist,
}

impl TokenPurpose {
    /// Storage key prefix for this purpose
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::VerificationPhone => "verification:phone:",
            Self::VerificationEmail => "verification:email:",
            Self::SignupIntermediate => "access:signup:",
            Self::PasswordResetIntermediate => "access:findpw:",
            Self::PasswordConfirmIntermediate => "access:password:",
            Self::SessionRefresh => "jwt:refresh:",
            Self::AccessBlacklist => "jwt:blacklist:",
        }
    }

    /// Fixed lifetime for entries of this purpose
    ///
    /// `AccessBlacklist` has no fixed lifetime; its entries live exactly as
    /// long as the revoked credential would have.
    pub const fn ttl_seconds(&self) -> Option<u64> {
        match self {
            Self::VerificationPhone => Some(300),
            Self::VerificationEmail => Some(300),
            Self::SignupIntermediate => Some(600),
            Self::PasswordResetIntermediate => Some(300),
            Self::PasswordConfirmIntermediate => Some(300),
            Self::SessionRefresh => Some(1_209_600),
            Self::AccessBlacklist => None,
        }
    }

    /// Full storage key for a token under this purpose
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix(), key)
    }
}

/// Why an access credential was blacklisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlacklistReason {
    /// Holder signed out; the credential is dead
    SignOut,
    /// Account data changed; next use forces a transparent refresh
    Update,
}

impl BlacklistReason {
    /// Convert to string representation for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignOut => "SIGNOUT",
            Self::Update => "UPDATE",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SIGNOUT" => Some(Self::SignOut),
            "UPDATE" => Some(Self::Update),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_are_distinct() {
        let purposes = [
            TokenPurpose::VerificationPhone,
            TokenPurpose::VerificationEmail,
            TokenPurpose::SignupIntermediate,
            TokenPurpose::PasswordResetIntermediate,
            TokenPurpose::PasswordConfirmIntermediate,
            TokenPurpose::SessionRefresh,
            TokenPurpose::AccessBlacklist,
        ];
        for (i, a) in purposes.iter().enumerate() {
            for b in purposes.iter().skip(i + 1) {
                assert_ne!(a.prefix(), b.prefix());
            }
        }
    }

    #[test]
    fn test_storage_key_concatenates_prefix() {
        let key = TokenPurpose::SignupIntermediate.storage_key("abc-123");
        assert_eq!(key, "access:signup:abc-123");
    }

    #[test]
    fn test_ttls() {
        assert_eq!(TokenPurpose::VerificationPhone.ttl_seconds(), Some(300));
        assert_eq!(TokenPurpose::SignupIntermediate.ttl_seconds(), Some(600));
        assert_eq!(TokenPurpose::SessionRefresh.ttl_seconds(), Some(14 * 86400));
        assert_eq!(TokenPurpose::AccessBlacklist.ttl_seconds(), None);
    }

    #[test]
    fn test_blacklist_reason_round_trip() {
        assert_eq!(BlacklistReason::parse("SIGNOUT"), Some(BlacklistReason::SignOut));
        assert_eq!(BlacklistReason::parse("UPDATE"), Some(BlacklistReason::Update));
        assert_eq!(BlacklistReason::parse("OTHER"), None);
    }
}
