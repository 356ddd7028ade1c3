//! Session guard for `/private/` routes.
//!
//! Authenticates the access/refresh pair on every guarded request. A valid
//! access credential passes straight through; an expired or superseded one
//! triggers a transparent rotation, with the fresh pair written onto the
//! response in whichever transport the client speaks. Handlers read the
//! outcome through the [`SessionContext`] extractor.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use sp_core::domain::value_objects::Claims;
use sp_core::errors::{CredentialError, DomainError};
use sp_core::services::session::AccessDecision;

use crate::client::{client_ip, read_token, ClientKind, TokenDelivery, ACCESS_TOKEN, REFRESH_TOKEN};
use crate::handlers::ApiError;
use crate::state::AppState;

/// Authenticated session attached to the request
///
/// Carries the pair that is live after the guard ran. When the guard
/// rotated, these are the fresh tokens, so a sign-out in the same request
/// revokes the credentials the client is about to receive.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub claims: Claims,
    pub access_token: String,
    pub refresh_token: String,
}

impl actix_web::FromRequest for SessionContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<SessionContext>()
            .cloned()
            .ok_or_else(|| {
                ApiError::unauthorized("AUTH_INVALID_REQUEST", "Authentication required").into()
            });
        ready(result)
    }
}

/// Guarded paths live under a `/private` segment. The verification
/// sign-out is the one exception: its holder carries a verification
/// credential, not a session pair, and the handler checks it itself.
fn guarded(path: &str) -> bool {
    (path.contains("/private/") || path.ends_with("/private")) && !path.ends_with("/out/auth")
}

/// Classifies an `authenticate` failure for the response code.
///
/// Credential-class failures mean the presented pair itself was rejected;
/// everything else can only have come from the silent refresh attempt.
fn rejection(err: DomainError) -> ApiError {
    match err {
        DomainError::Credential(CredentialError::ValidationFailed)
        | DomainError::Credential(CredentialError::TimedOut) => {
            ApiError::unauthorized("AUTH_REQUIRED", "Session credential rejected")
        }
        _ => ApiError::unauthorized("AUTH_REFRESH_FAILED", "Session could not be renewed"),
    }
}

/// Session guard middleware factory
pub struct SessionGuard;

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
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

        Box::pin(async move {
            if !guarded(req.path()) {
                return service.call(req).await;
            }

            let state = match req.app_data::<web::Data<AppState>>() {
                Some(state) => state.clone(),
                None => {
                    return Err(ApiError::new(
                        actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Session service not configured",
                    )
                    .into())
                }
            };

            let kind = ClientKind::of(req.request());
            let presented = (
                read_token(req.request(), ACCESS_TOKEN),
                read_token(req.request(), REFRESH_TOKEN),
            );
            let (access, refresh) = match presented {
                (Some(access), Some(refresh)) => (access, refresh),
                _ => {
                    return Err(ApiError::unauthorized(
                        "AUTH_INVALID_REQUEST",
                        "Session credentials not presented",
                    )
                    .into())
                }
            };

            let ip = client_ip(req.request());
            let decision = state
                .session
                .authenticate(Some(&access), Some(&refresh), &ip)
                .await
                .map_err(rejection)?;

            let (claims, access, refresh, delivery) = match decision {
                AccessDecision::Authorized(claims) => (claims, access, refresh, None),
                AccessDecision::Rotated { claims, tokens } => {
                    let delivery = TokenDelivery::new(kind)
                        .set(
                            ACCESS_TOKEN,
                            tokens.access_token.as_str(),
                            tokens.access_expires_in,
                        )
                        .set(
                            REFRESH_TOKEN,
                            tokens.refresh_token.as_str(),
                            tokens.refresh_expires_in,
                        );
                    (
                        claims,
                        tokens.access_token,
                        tokens.refresh_token,
                        Some(delivery),
                    )
                }
            };

            req.extensions_mut().insert(SessionContext {
                claims,
                access_token: access,
                refresh_token: refresh,
            });

            let mut res = service.call(req).await?;
            if let Some(delivery) = delivery {
                delivery.apply(res.response_mut());
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_path_selection() {
        assert!(guarded("/api/session/private/out"));
        assert!(guarded("/api/account/private/password/confirm"));
        assert!(guarded("/api/account/private"));

        assert!(!guarded("/api/session/public/in"));
        assert!(!guarded("/api/session/public/refresh"));
        assert!(!guarded("/health"));
        // Verification sign-out authenticates its own credential.
        assert!(!guarded("/api/session/private/out/auth"));
    }

    #[test]
    fn test_rejection_codes() {
        let err = rejection(CredentialError::ValidationFailed.into());
        assert_eq!(err.code(), "AUTH_REQUIRED");

        let err = rejection(CredentialError::TimedOut.into());
        assert_eq!(err.code(), "AUTH_REQUIRED");

        let err = rejection(sp_core::errors::TokenError::ValueMismatch.into());
        assert_eq!(err.code(), "AUTH_REFRESH_FAILED");

        let err = rejection(sp_core::errors::SignError::StatusStay.into());
        assert_eq!(err.code(), "AUTH_REFRESH_FAILED");
    }
}
