//! Account entity for back-office operators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::versioned::Versioned;

/// Account lifecycle status
///
/// Stored as its string form. `Stay` is the automatic lockout state after
/// repeated sign-in failures; only a password reset moves it back to
/// `Active`. `Stop` and `Delete` are operator decisions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Stay,
    Stop,
    Delete,
}

impl AccountStatus {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Stay => "STAY",
            Self::Stop => "STOP",
            Self::Delete => "DELETE",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "STAY" => Some(Self::Stay),
            "STOP" => Some(Self::Stop),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a back-office operator account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Unique identifier (assigned by the database)
    pub account_id: i64,

    /// Sign-in email, unique
    pub email: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Lifecycle status
    pub status: AccountStatus,

    /// Optimistic concurrency version, bumped on every persisted update
    pub version: i64,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new active account (identifier assigned on insert)
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            account_id: 0,
            email: email.into(),
            password_hash: password_hash.into(),
            name: name.into(),
            phone: phone.into(),
            status: AccountStatus::Active,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks if the account may sign in
    pub fn can_sign_in(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Checks if the account has been soft deleted
    pub fn is_deleted(&self) -> bool {
        self.status == AccountStatus::Delete
    }

    /// Suspends the account after too many sign-in failures
    pub fn suspend(&mut self) {
        self.status = AccountStatus::Stay;
        self.updated_at = Utc::now();
    }

    /// Reactivates a suspended account (after password reset)
    pub fn reactivate(&mut self) {
        self.status = AccountStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Marks the account as deleted (soft delete)
    pub fn mark_deleted(&mut self) {
        self.status = AccountStatus::Delete;
        self.updated_at = Utc::now();
    }

    /// Replaces the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.updated_at = Utc::now();
    }
}

impl Versioned for Account {
    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new("admin@spotless.kr", "$2b$12$hash", "Kim Cheol-su", "010-1234-5678")
    }

    #[test]
    fn test_new_account_is_active() {
        let account = account();
        assert_eq!(account.status, AccountStatus::Active);
        assert!(account.can_sign_in());
        assert!(!account.is_deleted());
        assert_eq!(account.version, 0);
    }

    #[test]
    fn test_suspend_blocks_sign_in() {
        let mut account = account();
        account.suspend();
        assert_eq!(account.status, AccountStatus::Stay);
        assert!(!account.can_sign_in());
    }

    #[test]
    fn test_reactivate_after_suspension() {
        let mut account = account();
        account.suspend();
        account.reactivate();
        assert!(account.can_sign_in());
    }

    #[test]
    fn test_mark_deleted() {
        let mut account = account();
        account.mark_deleted();
        assert!(account.is_deleted());
        assert!(!account.can_sign_in());
    }

    #[test]
    fn test_set_password_hash_touches_updated_at() {
        let mut account = account();
        let before = account.updated_at;
        account.set_password_hash("$2b$12$newhash");
        assert_eq!(account.password_hash, "$2b$12$newhash");
        assert!(account.updated_at >= before);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Stay,
            AccountStatus::Stop,
            AccountStatus::Delete,
        ] {
            assert_eq!(AccountStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AccountStatus::parse("UNKNOWN"), None);
    }

    #[test]
    fn test_check_version() {
        let account = account();
        assert!(account.check_version(0).is_ok());
        assert!(account.check_version(3).is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(account()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "admin@spotless.kr");
    }
}
