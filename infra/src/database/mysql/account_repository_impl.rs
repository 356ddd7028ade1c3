//! MySQL implementation of the AccountRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use sp_core::domain::entities::account::{Account, AccountStatus};
use sp_core::errors::DomainError;
use sp_core::repositories::AccountRepository;

/// MySQL-backed account repository
///
/// Updates are version-guarded: the row must still carry the version the
/// caller read, otherwise nothing is written and the conflict is reported.
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an Account entity
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        let status_str: String = row.try_get("status").map_err(|e| DomainError::Internal {
            message: format!("Failed to get status: {}", e),
        })?;
        let status = AccountStatus::parse(&status_str).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown account status: {}", status_str),
        })?;

        Ok(Account {
            account_id: row.try_get("account_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get account_id: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("Failed to get email: {}", e),
            })?,
            password_hash: row.try_get("password_hash").map_err(|e| DomainError::Internal {
                message: format!("Failed to get password_hash: {}", e),
            })?,
            name: row.try_get("name").map_err(|e| DomainError::Internal {
                message: format!("Failed to get name: {}", e),
            })?,
            phone: row.try_get("phone").map_err(|e| DomainError::Internal {
                message: format!("Failed to get phone: {}", e),
            })?,
            status,
            version: row.try_get("version").map_err(|e| DomainError::Internal {
                message: format!("Failed to get version: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, account_id: i64) -> Result<Option<Account>, DomainError> {
        let query = r#"
            SELECT account_id, email, password_hash, name, phone,
                   status, version, created_at, updated_at
            FROM accounts
            WHERE account_id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let query = r#"
            SELECT account_id, email, password_hash, name, phone,
                   status, version, created_at, updated_at
            FROM accounts
            WHERE email = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, mut account: Account) -> Result<Account, DomainError> {
        if self.exists_by_email(&account.email).await? {
            return Err(DomainError::Validation {
                message: "Email already registered".to_string(),
            });
        }

        let query = r#"
            INSERT INTO accounts (
                email, password_hash, name, phone,
                status, version, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.name)
            .bind(&account.phone)
            .bind(account.status.as_str())
            .bind(account.version)
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create account: {}", e),
            })?;

        account.account_id = result.last_insert_id() as i64;
        Ok(account)
    }

    async fn update(&self, mut account: Account) -> Result<Account, DomainError> {
        let now = Utc::now();
        let query = r#"
            UPDATE accounts SET
                email = ?,
                password_hash = ?,
                name = ?,
                phone = ?,
                status = ?,
                version = version + 1,
                updated_at = ?
            WHERE account_id = ? AND version = ?
        "#;

        let result = sqlx::query(query)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.name)
            .bind(&account.phone)
            .bind(account.status.as_str())
            .bind(now)
            .bind(account.account_id)
            .bind(account.version)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update account: {}", e),
            })?;

        if result.rows_affected() == 0 {
            // Either the row is gone or another writer got there first;
            // re-read the live version to tell the two apart.
            let current: Option<i64> =
                sqlx::query_scalar("SELECT version FROM accounts WHERE account_id = ?")
                    .bind(account.account_id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| DomainError::Internal {
                        message: format!("Failed to read account version: {}", e),
                    })?;

            return match current {
                None => Err(DomainError::NotFound {
                    resource: "Account".to_string(),
                }),
                Some(current) => Err(DomainError::VersionConflict {
                    submitted: account.version,
                    current,
                }),
            };
        }

        account.version += 1;
        account.updated_at = now;
        Ok(account)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let query = r#"
            SELECT EXISTS(
                SELECT 1 FROM accounts WHERE email = ?
            ) as account_exists
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to check account existence: {}", e),
            })?;

        let exists: i8 = row.try_get("account_exists").map_err(|e| DomainError::Internal {
            message: format!("Failed to get existence result: {}", e),
        })?;

        Ok(exists == 1)
    }
}
