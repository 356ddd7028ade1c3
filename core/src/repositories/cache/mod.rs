//! Key-value cache port backing the token store and the rate limiter.

mod r#trait;
pub use r#trait::KeyValueCache;

mod memory;
pub use memory::InMemoryCache;
