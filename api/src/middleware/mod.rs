//! HTTP middleware: CORS, transport security, rate limiting and the
//! session guard.

pub mod cors;
pub mod rate_limit;
pub mod security;
pub mod session_guard;

pub use rate_limit::RequestRateLimit;
pub use security::SecurityMiddleware;
pub use session_guard::{SessionContext, SessionGuard};
