//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Practical email shape check; full RFC validation is not attempted
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

// Korean mobile numbers with or without dashes (010-1234-5678)
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^01[016789]-?\d{3,4}-?\d{4}$").unwrap()
});

/// Check if an email address has a valid shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check if a phone number is a valid mobile number
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Check password strength: at least 8 characters, one letter and one digit
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Check if a string is not blank
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Normalize a phone number by removing formatting characters
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}
