//! Shared utilities and common types for the Spotless back office
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - API response envelope
//! - Utility functions (masking, validation)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CredentialConfig, DatabaseConfig, Environment, LoggingConfig,
    ServerConfig,
};
pub use types::{ApiResponse, ErrorBody};
pub use utils::{masking, validation};
