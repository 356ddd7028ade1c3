//! Per-IP request budget enforced ahead of the handlers.
//!
//! Delegates to the domain rate limiter with the `ClientRequest` action,
//! so the HTTP layer and any other entry point share one budget per
//! client. The health endpoint is exempt; monitors poll it freely.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use sp_core::services::rate_limit::RateLimitAction;

use crate::client::client_ip;
use crate::handlers::ApiError;
use crate::state::AppState;

fn exempt(path: &str) -> bool {
    path == "/health"
}

/// Rate limiting middleware factory
pub struct RequestRateLimit;

impl<S, B> Transform<S, ServiceRequest> for RequestRateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestRateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestRateLimitMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestRateLimitMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestRateLimitMiddleware<S>
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
            if exempt(req.path()) {
                return service.call(req).await;
            }

            if let Some(state) = req.app_data::<web::Data<AppState>>() {
                let ip = client_ip(req.request());
                state
                    .limiter
                    .check_and_consume(RateLimitAction::ClientRequest, &ip)
                    .await
                    .map_err(ApiError::from)?;
            }

            service.call(req).await
        })
    }
}
