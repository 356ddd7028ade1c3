//! Database connection pool management

use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    ConnectOptions, MySqlPool, Row,
};
use tracing::log::LevelFilter;

use sp_shared::config::DatabaseConfig;

use crate::InfraError;

/// MySQL connection pool wrapper
///
/// Owns the SQLx pool and its lifecycle; repositories borrow the inner
/// pool through [`DatabasePool::pool`].
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Creates a connection pool from the shared database configuration
    ///
    /// # Arguments
    /// * `config` - Connection URL, pool sizing and timeouts
    ///
    /// # Returns
    /// * `Result<Self, InfraError>` - Connected pool or error
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfraError> {
        tracing::info!(
            max_connections = config.max_connections,
            "creating database connection pool"
        );

        let connect_options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfraError::Config(format!("Invalid database URL: {}", e)))?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_secs(1));

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                InfraError::Database(e)
            })?;

        tracing::info!("Database connection pool created");
        Ok(Self { pool })
    }

    /// Reference to the underlying SQLx pool for queries and transactions
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Verifies connectivity with a trivial query
    pub async fn health_check(&self) -> Result<bool, InfraError> {
        let row = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                InfraError::Database(e)
            })?;

        let value: i32 = row.try_get(0).unwrap_or(0);
        Ok(value == 1)
    }

    /// Closes all connections; call during shutdown
    pub async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }
}
