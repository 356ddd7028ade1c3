//! Common type definitions
//!
//! - `response` - API response envelope shared by every endpoint

pub mod response;

pub use response::{ApiResponse, ErrorBody};
