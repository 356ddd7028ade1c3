//! Client-aware token transport.
//!
//! Mobile clients exchange tokens through request and response headers;
//! web clients through HttpOnly cookies. Handlers and middleware describe
//! what to set or clear and [`TokenDelivery`] applies it in the transport
//! the caller actually uses.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpRequest, HttpResponse};
use tracing::warn;

/// Session access credential
pub const ACCESS_TOKEN: &str = "X-Access-Token";
/// Session refresh credential
pub const REFRESH_TOKEN: &str = "X-Refresh-Token";
/// Channel-verification session credential
pub const AUTH_TOKEN: &str = "X-Auth-Token";
/// Phone ownership proof waiting to be consumed
pub const VERIFICATION_PHONE_TOKEN: &str = "X-Verification-Phone-Token";
/// Email ownership proof waiting to be consumed
pub const VERIFICATION_EMAIL_TOKEN: &str = "X-Verification-Email-Token";
/// Two-phase signup intermediate
pub const SIGNUP_TOKEN: &str = "X-Access-SignUp-Token";
/// Find-password intermediate
pub const FIND_PW_TOKEN: &str = "X-Access-FindPw-Token";
/// Sensitive-action confirm intermediate
pub const PASSWORD_CONFIRM_TOKEN: &str = "X-Password-Confirm-Token";

/// Which transport the caller speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// Tokens travel in headers
    Mobile,
    /// Tokens travel in HttpOnly cookies
    Web,
}

impl ClientKind {
    /// Classifies the request by its `X-Client-Type` header.
    ///
    /// Anything that does not announce itself as mobile is treated as web,
    /// so browsers without the header still get cookie transport.
    pub fn of(req: &HttpRequest) -> Self {
        let client_type = req
            .headers()
            .get("X-Client-Type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if client_type.to_ascii_lowercase().contains("mobile") {
            Self::Mobile
        } else {
            Self::Web
        }
    }
}

/// Reads a named token from the transport matching the client kind
pub fn read_token(req: &HttpRequest, name: &str) -> Option<String> {
    match ClientKind::of(req) {
        ClientKind::Mobile => req
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ClientKind::Web => req.cookie(name).map(|c| c.value().to_string()),
    }
    .filter(|t| !t.is_empty())
}

/// Client IP for attempt records and rate limiting.
///
/// Prefers proxy headers so records survive a load balancer in front.
pub fn client_ip(req: &HttpRequest) -> String {
    if let Some(forwarded) = req.headers().get("X-Forwarded-For") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }
    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(value) = real_ip.to_str() {
            return value.to_string();
        }
    }
    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Pending token writes for one response
#[derive(Debug, Clone)]
pub struct TokenDelivery {
    kind: ClientKind,
    set: Vec<(&'static str, String, i64)>,
    clear: Vec<&'static str>,
}

impl TokenDelivery {
    pub fn new(kind: ClientKind) -> Self {
        Self {
            kind,
            set: Vec::new(),
            clear: Vec::new(),
        }
    }

    /// Queues a token to hand to the client. `ttl_seconds` bounds the
    /// cookie lifetime; header transport ignores it.
    pub fn set(mut self, name: &'static str, value: impl Into<String>, ttl_seconds: i64) -> Self {
        self.set.push((name, value.into(), ttl_seconds));
        self
    }

    /// Queues removal of a consumed token. Cookie transport only; mobile
    /// clients drop consumed tokens themselves.
    pub fn clear(mut self, name: &'static str) -> Self {
        self.clear.push(name);
        self
    }

    /// Writes the queued tokens onto the response
    pub fn apply<B>(&self, response: &mut HttpResponse<B>) {
        match self.kind {
            ClientKind::Mobile => {
                for (name, value, _) in &self.set {
                    match (
                        HeaderName::from_bytes(name.as_bytes()),
                        HeaderValue::from_str(value),
                    ) {
                        (Ok(header), Ok(value)) => {
                            response.headers_mut().insert(header, value);
                        }
                        _ => warn!(token = name, "token not representable as header"),
                    }
                }
            }
            ClientKind::Web => {
                for (name, value, ttl_seconds) in &self.set {
                    let cookie = Cookie::build(*name, value.as_str())
                        .path("/")
                        .http_only(true)
                        .same_site(SameSite::Lax)
                        .max_age(CookieDuration::seconds(*ttl_seconds))
                        .finish();
                    if response.add_cookie(&cookie).is_err() {
                        warn!(token = name, "token not representable as cookie");
                    }
                }
                for name in &self.clear {
                    let mut cookie = Cookie::new(*name, "");
                    cookie.set_path("/");
                    if response.add_removal_cookie(&cookie).is_err() {
                        warn!(token = name, "cookie removal failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::SET_COOKIE;
    use actix_web::test::TestRequest;

    #[test]
    fn test_client_kind_detection() {
        let mobile = TestRequest::default()
            .insert_header(("X-Client-Type", "mobile-ios"))
            .to_http_request();
        assert_eq!(ClientKind::of(&mobile), ClientKind::Mobile);

        let web = TestRequest::default()
            .insert_header(("X-Client-Type", "web"))
            .to_http_request();
        assert_eq!(ClientKind::of(&web), ClientKind::Web);

        let missing = TestRequest::default().to_http_request();
        assert_eq!(ClientKind::of(&missing), ClientKind::Web);
    }

    #[test]
    fn test_read_token_header_for_mobile() {
        let req = TestRequest::default()
            .insert_header(("X-Client-Type", "mobile"))
            .insert_header((ACCESS_TOKEN, "tok-123"))
            .to_http_request();
        assert_eq!(read_token(&req, ACCESS_TOKEN), Some("tok-123".to_string()));
    }

    #[test]
    fn test_read_token_cookie_for_web() {
        let req = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN, "tok-456"))
            .to_http_request();
        assert_eq!(read_token(&req, ACCESS_TOKEN), Some("tok-456".to_string()));

        // A web client presenting the token as a header is not accepted.
        let header_only = TestRequest::default()
            .insert_header((ACCESS_TOKEN, "tok-456"))
            .to_http_request();
        assert_eq!(read_token(&header_only, ACCESS_TOKEN), None);
    }

    #[test]
    fn test_read_token_rejects_empty() {
        let req = TestRequest::default()
            .cookie(Cookie::new(REFRESH_TOKEN, ""))
            .to_http_request();
        assert_eq!(read_token(&req, REFRESH_TOKEN), None);
    }

    #[test]
    fn test_client_ip_prefers_forwarded_chain() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
            .insert_header(("X-Real-IP", "10.0.0.2"))
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.9");

        let real_ip_only = TestRequest::default()
            .insert_header(("X-Real-IP", "10.0.0.2"))
            .to_http_request();
        assert_eq!(client_ip(&real_ip_only), "10.0.0.2");
    }

    #[test]
    fn test_delivery_sets_headers_for_mobile() {
        let mut response = HttpResponse::Ok().finish();
        TokenDelivery::new(ClientKind::Mobile)
            .set(ACCESS_TOKEN, "access-1", 3600)
            .set(REFRESH_TOKEN, "refresh-1", 1_209_600)
            .clear(AUTH_TOKEN)
            .apply(&mut response);

        assert_eq!(
            response.headers().get(ACCESS_TOKEN).unwrap(),
            "access-1"
        );
        assert_eq!(
            response.headers().get(REFRESH_TOKEN).unwrap(),
            "refresh-1"
        );
        // Header transport has nothing to clear.
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn test_delivery_sets_cookies_for_web() {
        let mut response = HttpResponse::Ok().finish();
        TokenDelivery::new(ClientKind::Web)
            .set(ACCESS_TOKEN, "access-1", 3600)
            .clear(VERIFICATION_EMAIL_TOKEN)
            .apply(&mut response);

        let cookies: Vec<_> = response.cookies().collect();
        let access = cookies
            .iter()
            .find(|c| c.name() == ACCESS_TOKEN)
            .expect("access cookie");
        assert_eq!(access.value(), "access-1");
        assert!(access.http_only().unwrap_or(false));
        assert_eq!(
            access.max_age(),
            Some(CookieDuration::seconds(3600))
        );

        let cleared = cookies
            .iter()
            .find(|c| c.name() == VERIFICATION_EMAIL_TOKEN)
            .expect("removal cookie");
        assert_eq!(cleared.value(), "");
        // Removal cookies carry an elapsed lifetime.
        assert_eq!(cleared.max_age(), Some(CookieDuration::ZERO));
        assert!(response.headers().get(ACCESS_TOKEN).is_none());
    }
}
