//! CORS built from configuration.
//!
//! Cookie transport needs credentials, and mobile clients read their
//! tokens from response headers, so the exposed-header list must cover
//! every token name the api can emit. Both lists come from
//! [`CorsConfig`] so deployments stay declarative.

use actix_cors::Cors;
use tracing::warn;

use sp_shared::config::CorsConfig;

/// Builds the CORS middleware from the configured policy.
///
/// An empty origin list allows any origin, echoing the caller's origin
/// rather than a wildcard so credentialed requests still work. Use it for
/// development only.
pub fn build(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default().max_age(config.max_age as usize);

    if config.allowed_origins.is_empty() {
        warn!("no CORS origins configured, allowing any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors = cors
        .allowed_methods(config.allowed_methods.iter().map(String::as_str))
        .allowed_headers(config.allowed_headers.iter().map(String::as_str))
        .expose_headers(config.exposed_headers.iter().map(String::as_str));

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
