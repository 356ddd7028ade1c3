//! Fixed-window request rate limiting
//!
//! One counter per action and subject in the key-value store. The window
//! starts with the first request and is never sliced, so a burst across a
//! window boundary can briefly see up to twice the limit; that trade-off
//! buys a single atomic INCR per check.

mod limiter;

pub use limiter::{RateLimitAction, RateLimiter};
