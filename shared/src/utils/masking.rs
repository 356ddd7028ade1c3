//! Masking helpers for log output
//!
//! Tokens and addresses never appear whole in logs. These helpers keep a
//! recognizable prefix so entries can still be correlated during debugging.

/// Mask a token for display (e.g., `eyJhbGci****`)
pub fn mask_token(token: &str) -> String {
    if token.len() > 8 {
        format!("{}****", &token[..8])
    } else {
        "****".to_string()
    }
}

/// Mask an email address for display (e.g., `c****@spotless.kr`)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let head: String = local.chars().take(1).collect();
            format!("{}****@{}", head, domain)
        }
        _ => "****".to_string(),
    }
}

/// Mask a phone number for display (e.g., `010****5678`)
pub fn mask_phone(phone: &str) -> String {
    if phone.len() > 7 {
        format!("{}****{}", &phone[..3], &phone[phone.len() - 4..])
    } else {
        "****".to_string()
    }
}

/// Mask a recipient that may be either a phone number or an email address
pub fn mask_recipient(recipient: &str) -> String {
    if recipient.contains('@') {
        mask_email(recipient)
    } else {
        mask_phone(recipient)
    }
}
