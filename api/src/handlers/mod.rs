//! Error translation between the domain and HTTP

mod error;

pub use error::ApiError;
