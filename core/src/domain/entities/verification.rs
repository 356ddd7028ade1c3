//! Verification entity for phone and email ownership checks.
//!
//! Code delivery and comparison happen in an external collaborator; this
//! entity only records whether a recipient confirmed a code and when.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Channel a verification code was sent over
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationChannel {
    Phone,
    Email,
}

impl VerificationChannel {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "phone" => Some(Self::Phone),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    /// How long a verification stays usable after creation
    ///
    /// Phone codes confirm within minutes or not at all; email round-trips
    /// are slower, so the window is wider.
    pub fn window(&self) -> Duration {
        match self {
            Self::Phone => Duration::minutes(3),
            Self::Email => Duration::minutes(10),
        }
    }
}

/// Represents one verification round for a recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verification {
    /// Unique identifier (assigned by the database)
    pub verification_id: i64,

    /// Channel the code was delivered over
    pub channel: VerificationChannel,

    /// Phone number or email address the code was sent to
    pub recipient: String,

    /// Whether the recipient confirmed the code
    pub verified: bool,

    /// Timestamp when the verification round started
    pub created_at: DateTime<Utc>,
}

impl Verification {
    /// Creates a new unverified round
    pub fn new(channel: VerificationChannel, recipient: impl Into<String>) -> Self {
        Self {
            verification_id: 0,
            channel,
            recipient: recipient.into(),
            verified: false,
            created_at: Utc::now(),
        }
    }

    /// Marks the recipient as confirmed
    pub fn confirm(&mut self) {
        self.verified = true;
    }

    /// Checks whether the round is still inside its channel window
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at <= self.channel.window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_verification_unverified() {
        let verification = Verification::new(VerificationChannel::Phone, "010-1234-5678");
        assert!(!verification.verified);
        assert_eq!(verification.channel, VerificationChannel::Phone);
    }

    #[test]
    fn test_confirm() {
        let mut verification = Verification::new(VerificationChannel::Email, "user@spotless.kr");
        verification.confirm();
        assert!(verification.verified);
    }

    #[test]
    fn test_phone_window_is_three_minutes() {
        let verification = Verification::new(VerificationChannel::Phone, "010-1234-5678");
        let inside = verification.created_at + Duration::minutes(2);
        let outside = verification.created_at + Duration::minutes(4);
        assert!(verification.is_within_window(inside));
        assert!(!verification.is_within_window(outside));
    }

    #[test]
    fn test_email_window_is_ten_minutes() {
        let verification = Verification::new(VerificationChannel::Email, "user@spotless.kr");
        let inside = verification.created_at + Duration::minutes(9);
        let outside = verification.created_at + Duration::minutes(11);
        assert!(verification.is_within_window(inside));
        assert!(!verification.is_within_window(outside));
    }

    #[test]
    fn test_channel_round_trip() {
        assert_eq!(
            VerificationChannel::parse(VerificationChannel::Phone.as_str()),
            Some(VerificationChannel::Phone)
        );
        assert_eq!(
            VerificationChannel::parse(VerificationChannel::Email.as_str()),
            Some(VerificationChannel::Email)
        );
        assert_eq!(VerificationChannel::parse("fax"), None);
    }
}
