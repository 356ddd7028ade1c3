//! Configuration for the session orchestrator

use crate::services::sign_attempt::MAX_UNRESOLVED_FAILURES;

/// Tuning for the session service
#[derive(Debug, Clone)]
pub struct SessionServiceConfig {
    /// bcrypt cost factor for newly hashed passwords
    pub bcrypt_cost: u32,

    /// Unresolved password failures at which an account is suspended
    pub max_unresolved_failures: u32,
}

impl Default for SessionServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            max_unresolved_failures: MAX_UNRESOLVED_FAILURES,
        }
    }
}
