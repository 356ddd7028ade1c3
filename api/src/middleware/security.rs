//! Transport security policy.
//!
//! Production refuses plain-HTTP requests and stamps security headers on
//! every response. Responses carry credentials in cookies and headers, so
//! caching is disabled across the board.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ErrorForbidden;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};
use tracing::warn;

use sp_shared::Environment;

/// Security middleware factory
pub struct SecurityMiddleware {
    enforce_https: bool,
    add_headers: bool,
}

impl SecurityMiddleware {
    /// Policy matching the runtime environment
    pub fn for_environment(env: Environment) -> Self {
        Self {
            enforce_https: env.is_production(),
            add_headers: env.is_production(),
        }
    }

    /// No enforcement, for local runs and tests
    pub fn development() -> Self {
        Self {
            enforce_https: false,
            add_headers: false,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            enforce_https: self.enforce_https,
            add_headers: self.add_headers,
        }))
    }
}

pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    enforce_https: bool,
    add_headers: bool,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let enforce_https = self.enforce_https;
        let add_headers = self.add_headers;

        Box::pin(async move {
            if enforce_https && !is_secure(&req) {
                warn!(method = %req.method(), path = req.path(), "insecure request blocked");
                return Err(ErrorForbidden("HTTPS required"));
            }

            let mut res = service.call(req).await?;
            if add_headers {
                add_security_headers(&mut res);
            }
            Ok(res)
        })
    }
}

/// HTTPS directly or via a terminating proxy
fn is_secure(req: &ServiceRequest) -> bool {
    let info = req.connection_info();
    if info.scheme() == "https" {
        return true;
    }

    if let Some(proto) = req.headers().get("x-forwarded-proto") {
        if proto.to_str().map(|p| p == "https").unwrap_or(false) {
            return true;
        }
    }

    let host = info.host();
    host == "localhost"
        || host.starts_with("localhost:")
        || host.starts_with("127.0.0.1")
        || host.starts_with("[::1]")
}

fn add_security_headers<B>(res: &mut ServiceResponse<B>) {
    let headers = res.headers_mut();

    headers.insert(
        HeaderName::from_static("strict-transport-security"),
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none';"),
    );
    // Responses carry tokens; nothing here is cacheable.
    headers.insert(
        HeaderName::from_static("cache-control"),
        HeaderValue::from_static("no-store"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_proto_counts_as_secure() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-proto", "https"))
            .to_srv_request();
        assert!(is_secure(&req));

        let plain = TestRequest::default()
            .insert_header(("x-forwarded-proto", "http"))
            .to_srv_request();
        // TestRequest hosts default to localhost, which stays allowed.
        assert!(is_secure(&plain));
    }

    #[test]
    fn test_environment_policy() {
        let prod = SecurityMiddleware::for_environment(Environment::Production);
        assert!(prod.enforce_https);
        assert!(prod.add_headers);

        let dev = SecurityMiddleware::for_environment(Environment::Development);
        assert!(!dev.enforce_https);
        assert!(!dev.add_headers);
    }
}
