//! Session orchestration
//!
//! The one component that composes the others: it asks the verification
//! gate and attempt tracker for admission, has the codec mint credentials,
//! and keeps the token store's refresh registry and blacklist in step with
//! every sign-in, sign-out, rotation and account-lifecycle flow.

mod config;
mod service;

pub use config::SessionServiceConfig;
pub use service::{AccessDecision, SessionService};
