//! MySQL implementation of the VerificationRepository trait.
//!
//! Read-only: verification rows are written by the code-delivery service,
//! this subsystem only consults them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use sp_core::domain::entities::verification::{Verification, VerificationChannel};
use sp_core::errors::DomainError;
use sp_core::repositories::VerificationRepository;

/// MySQL-backed verification lookups
pub struct MySqlVerificationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationRepository {
    /// Create a new MySQL verification repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_verification(row: &sqlx::mysql::MySqlRow) -> Result<Verification, DomainError> {
        let channel_str: String = row.try_get("channel").map_err(|e| DomainError::Internal {
            message: format!("Failed to get channel: {}", e),
        })?;
        let channel =
            VerificationChannel::parse(&channel_str).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown verification channel: {}", channel_str),
            })?;

        Ok(Verification {
            verification_id: row.try_get("verification_id").map_err(|e| {
                DomainError::Internal {
                    message: format!("Failed to get verification_id: {}", e),
                }
            })?,
            channel,
            recipient: row.try_get("recipient").map_err(|e| DomainError::Internal {
                message: format!("Failed to get recipient: {}", e),
            })?,
            verified: row.try_get("verified").map_err(|e| DomainError::Internal {
                message: format!("Failed to get verified: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl VerificationRepository for MySqlVerificationRepository {
    async fn find_by_id(&self, verification_id: i64) -> Result<Option<Verification>, DomainError> {
        let query = r#"
            SELECT verification_id, channel, recipient, verified, created_at
            FROM verifications
            WHERE verification_id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(verification_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_verification(&row)?)),
            None => Ok(None),
        }
    }
}
