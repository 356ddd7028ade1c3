//! MySQL implementation of the SignAttemptRepository trait.

use async_trait::async_trait;
use sqlx::MySqlPool;

use sp_core::domain::entities::sign_attempt::{SignAttempt, SignOutcome};
use sp_core::errors::DomainError;
use sp_core::repositories::SignAttemptRepository;

/// MySQL-backed sign attempt log
///
/// Rows are append-only; the only update ever made is the `resolved_by`
/// back-link written when a resolving attempt lands.
pub struct MySqlSignAttemptRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSignAttemptRepository {
    /// Create a new MySQL sign attempt repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const INSERT_ATTEMPT: &str = r#"
    INSERT INTO sign_attempts (
        account_id, client_ip, outcome, reason, resolved_by, created_at
    ) VALUES (?, ?, ?, ?, ?, ?)
"#;

#[async_trait]
impl SignAttemptRepository for MySqlSignAttemptRepository {
    async fn insert(&self, mut attempt: SignAttempt) -> Result<SignAttempt, DomainError> {
        let result = sqlx::query(INSERT_ATTEMPT)
            .bind(attempt.account_id)
            .bind(&attempt.client_ip)
            .bind(attempt.outcome.as_str())
            .bind(&attempt.reason)
            .bind(attempt.resolved_by)
            .bind(attempt.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to insert sign attempt: {}", e),
            })?;

        attempt.attempt_id = result.last_insert_id() as i64;
        Ok(attempt)
    }

    async fn count_unresolved_failures(&self, account_id: i64) -> Result<u32, DomainError> {
        let query = r#"
            SELECT COUNT(*) FROM sign_attempts
            WHERE account_id = ?
              AND outcome = ?
              AND resolved_by IS NULL
        "#;

        let count: i64 = sqlx::query_scalar(query)
            .bind(account_id)
            .bind(SignOutcome::InvalidPassword.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to count unresolved failures: {}", e),
            })?;

        Ok(count as u32)
    }

    async fn insert_resolving(&self, mut attempt: SignAttempt) -> Result<SignAttempt, DomainError> {
        let account_id = attempt.account_id.ok_or_else(|| DomainError::Validation {
            message: "Resolving attempt must be attributed to an account".to_string(),
        })?;

        // The resolving row and the back-links land in one transaction so
        // a crash cannot leave failures half-cleared.
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let result = sqlx::query(INSERT_ATTEMPT)
            .bind(attempt.account_id)
            .bind(&attempt.client_ip)
            .bind(attempt.outcome.as_str())
            .bind(&attempt.reason)
            .bind(attempt.resolved_by)
            .bind(attempt.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to insert resolving attempt: {}", e),
            })?;

        attempt.attempt_id = result.last_insert_id() as i64;

        sqlx::query(
            r#"
            UPDATE sign_attempts SET resolved_by = ?
            WHERE account_id = ?
              AND outcome = ?
              AND resolved_by IS NULL
            "#,
        )
        .bind(attempt.attempt_id)
        .bind(account_id)
        .bind(SignOutcome::InvalidPassword.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to back-link resolved failures: {}", e),
        })?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit resolving attempt: {}", e),
        })?;

        Ok(attempt)
    }
}
