//! Redis cache backend

mod redis_client;

pub use redis_client::RedisClient;
