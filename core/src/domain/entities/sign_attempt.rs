//! Sign attempt entity recording authentication events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a recorded sign attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignOutcome {
    // Successful flows
    Signin,
    Signout,
    Signup,
    Delete,
    Refresh,
    UpdatePassword,

    // Failures
    InvalidEmail,
    InvalidPassword,
    RefreshFail,
    BlacklistToken,

    // Status gates
    AccountStay,
    AccountStop,
    AccountDelete,
}

impl SignOutcome {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signin => "SIGNIN",
            Self::Signout => "SIGNOUT",
            Self::Signup => "SIGNUP",
            Self::Delete => "DELETE",
            Self::Refresh => "REFRESH",
            Self::UpdatePassword => "UPDATE_PASSWORD",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::RefreshFail => "REFRESH_FAIL",
            Self::BlacklistToken => "BLACKLIST_TOKEN",
            Self::AccountStay => "ACCOUNT_STAY",
            Self::AccountStop => "ACCOUNT_STOP",
            Self::AccountDelete => "ACCOUNT_DELETE",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SIGNIN" => Some(Self::Signin),
            "SIGNOUT" => Some(Self::Signout),
            "SIGNUP" => Some(Self::Signup),
            "DELETE" => Some(Self::Delete),
            "REFRESH" => Some(Self::Refresh),
            "UPDATE_PASSWORD" => Some(Self::UpdatePassword),
            "INVALID_EMAIL" => Some(Self::InvalidEmail),
            "INVALID_PASSWORD" => Some(Self::InvalidPassword),
            "REFRESH_FAIL" => Some(Self::RefreshFail),
            "BLACKLIST_TOKEN" => Some(Self::BlacklistToken),
            "ACCOUNT_STAY" => Some(Self::AccountStay),
            "ACCOUNT_STOP" => Some(Self::AccountStop),
            "ACCOUNT_DELETE" => Some(Self::AccountDelete),
            _ => None,
        }
    }

    /// Whether this outcome counts toward the sign-in lockout threshold
    pub fn counts_toward_lockout(&self) -> bool {
        matches!(self, Self::InvalidPassword)
    }

    /// Whether this outcome resolves prior failures when recorded
    pub fn is_resolving(&self) -> bool {
        matches!(self, Self::Signin | Self::UpdatePassword)
    }
}

/// Represents one authentication event
///
/// Failure rows stay "unresolved" until a resolving attempt (successful
/// sign-in or password update) back-links them through `resolved_by`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignAttempt {
    /// Unique identifier (assigned by the database)
    pub attempt_id: i64,

    /// Account the attempt targeted, if it could be attributed
    pub account_id: Option<i64>,

    /// Client IP the attempt came from
    pub client_ip: String,

    /// What happened
    pub outcome: SignOutcome,

    /// Free-form detail (mismatch reason, refresh failure cause)
    pub reason: Option<String>,

    /// Identifier of the resolving attempt, set when failures are cleared
    pub resolved_by: Option<i64>,

    /// Timestamp when the event occurred
    pub created_at: DateTime<Utc>,
}

impl SignAttempt {
    /// Creates a new attempt record
    pub fn new(outcome: SignOutcome, client_ip: impl Into<String>) -> Self {
        Self {
            attempt_id: 0,
            account_id: None,
            client_ip: client_ip.into(),
            outcome,
            reason: None,
            resolved_by: None,
            created_at: Utc::now(),
        }
    }

    /// Attribute the attempt to an account
    pub fn with_account(mut self, account_id: i64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Attach a failure reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether the row is an unresolved lockout-relevant failure
    pub fn is_unresolved_failure(&self) -> bool {
        self.outcome.counts_toward_lockout() && self.resolved_by.is_none()
    }
}
