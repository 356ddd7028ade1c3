//! Route table for the api.
//!
//! `/public/` endpoints authenticate through the tokens they consume;
//! `/private/` endpoints additionally sit behind the session guard.

pub mod account;
pub mod health;
pub mod session;

use actix_web::{web, HttpRequest};

use sp_core::errors::{DomainError, TokenError};

use crate::client::read_token;
use crate::handlers::ApiError;

/// Reads a token the endpoint cannot proceed without
pub(crate) fn require_token(req: &HttpRequest, name: &str) -> Result<String, ApiError> {
    read_token(req, name)
        .ok_or_else(|| ApiError::from(DomainError::from(TokenError::IllegalToken)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health)).service(
        web::scope("/api")
            .service(
                web::scope("/session")
                    .route("/public/in", web::post().to(session::sign_in))
                    .route("/public/refresh", web::post().to(session::refresh))
                    .route(
                        "/public/in/auth/phone",
                        web::post().to(session::sign_in_by_phone),
                    )
                    .route(
                        "/public/in/auth/email",
                        web::post().to(session::sign_in_by_email),
                    )
                    .route("/private/out", web::post().to(session::sign_out))
                    .route("/private/out/auth", web::post().to(session::sign_out_auth)),
            )
            .service(
                web::scope("/account")
                    .route(
                        "/public/signup/token",
                        web::post().to(account::signup_token),
                    )
                    .route("/public/signup", web::post().to(account::signup))
                    .route(
                        "/public/password/token/phone",
                        web::post().to(account::password_token_by_phone),
                    )
                    .route(
                        "/public/password/token/email",
                        web::post().to(account::password_token_by_email),
                    )
                    .route(
                        "/public/password",
                        web::patch().to(account::update_password),
                    )
                    .route(
                        "/private/password/confirm",
                        web::post().to(account::password_confirm_token),
                    )
                    .route("/private", web::delete().to(account::delete_account)),
            ),
    );
}
