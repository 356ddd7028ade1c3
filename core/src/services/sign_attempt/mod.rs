//! Sign attempt tracking and lockout accounting
//!
//! Every authentication event leaves a row; unresolved password failures
//! accumulate until a resolving attempt back-links them or the lockout
//! threshold suspends the account.

mod tracker;

pub use tracker::{SignAttemptTracker, TrackerConfig, MAX_UNRESOLVED_FAILURES};
