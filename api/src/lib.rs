//! HTTP surface for the credential and session services.
//!
//! Routes live under `/api`, split into `/public/` endpoints that
//! authenticate through the tokens they carry and `/private/` endpoints
//! behind the session guard. Token transport adapts to the caller:
//! mobile clients exchange tokens through headers, web clients through
//! HttpOnly cookies.

pub mod client;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
