//! Account endpoints: two-phase signup, password recovery and the
//! version-guarded deletion.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use sp_core::domain::entities::verification::VerificationChannel;
use sp_core::domain::value_objects::TokenPurpose;
use sp_core::services::token::SignupPayload;
use sp_shared::types::response;
use sp_shared::validation;
use sp_shared::ApiResponse;

use crate::client::{
    client_ip, ClientKind, TokenDelivery, ACCESS_TOKEN, FIND_PW_TOKEN, PASSWORD_CONFIRM_TOKEN,
    REFRESH_TOKEN, SIGNUP_TOKEN, VERIFICATION_EMAIL_TOKEN, VERIFICATION_PHONE_TOKEN,
};
use crate::dto::{
    AccountCreatedResponse, DeleteAccountRequest, PasswordConfirmRequest, PasswordResetRequest,
    PasswordUpdateRequest, SignupTokenRequest,
};
use crate::handlers::ApiError;
use crate::middleware::SessionContext;
use crate::state::AppState;

use super::require_token;

fn intermediate_ttl(purpose: TokenPurpose) -> i64 {
    purpose.ttl_seconds().unwrap_or(0) as i64
}

/// POST /api/account/public/signup/token
///
/// First signup phase: the form rides in with the email ownership proof
/// and is parked under a signup token until the phone proof arrives.
pub async fn signup_token(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SignupTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(|e| ApiError::validation(&e))?;
    let email_key = require_token(&req, VERIFICATION_EMAIL_TOKEN)?;

    let form = SignupPayload::new(
        &body.email,
        &body.password,
        &body.name,
        validation::normalize_phone(&body.phone),
    );
    let signup_key = state.session.create_signup_token(&email_key, form).await?;

    let mut response = HttpResponse::Ok().json(response::empty());
    TokenDelivery::new(ClientKind::of(&req))
        .set(
            SIGNUP_TOKEN,
            signup_key.as_str(),
            intermediate_ttl(TokenPurpose::SignupIntermediate),
        )
        .clear(VERIFICATION_EMAIL_TOKEN)
        .apply(&mut response);
    Ok(response)
}

/// POST /api/account/public/signup
///
/// Second signup phase: the parked form and the phone ownership proof
/// meet, and the account is created.
pub async fn signup(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let signup_key = require_token(&req, SIGNUP_TOKEN)?;
    let phone_key = require_token(&req, VERIFICATION_PHONE_TOKEN)?;
    let ip = client_ip(&req);

    let account = state.session.sign_up(&signup_key, &phone_key, &ip).await?;

    let mut response = HttpResponse::Created()
        .json(ApiResponse::success(AccountCreatedResponse::from(&account)));
    TokenDelivery::new(ClientKind::of(&req))
        .clear(SIGNUP_TOKEN)
        .clear(VERIFICATION_PHONE_TOKEN)
        .apply(&mut response);
    Ok(response)
}

/// POST /api/account/public/password/token/phone
pub async fn password_token_by_phone(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse, ApiError> {
    password_token_by_channel(
        req,
        state,
        body,
        VerificationChannel::Phone,
        VERIFICATION_PHONE_TOKEN,
    )
    .await
}

/// POST /api/account/public/password/token/email
pub async fn password_token_by_email(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse, ApiError> {
    password_token_by_channel(
        req,
        state,
        body,
        VerificationChannel::Email,
        VERIFICATION_EMAIL_TOKEN,
    )
    .await
}

/// Exchanges a channel ownership proof for a password reset token
async fn password_token_by_channel(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PasswordResetRequest>,
    channel: VerificationChannel,
    token_name: &'static str,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(|e| ApiError::validation(&e))?;
    let verification_key = require_token(&req, token_name)?;

    let reset_key = state
        .session
        .create_password_reset_token(channel, &verification_key, &body.email)
        .await?;

    let mut response = HttpResponse::Ok().json(response::empty());
    TokenDelivery::new(ClientKind::of(&req))
        .set(
            FIND_PW_TOKEN,
            reset_key.as_str(),
            intermediate_ttl(TokenPurpose::PasswordResetIntermediate),
        )
        .clear(token_name)
        .apply(&mut response);
    Ok(response)
}

/// PATCH /api/account/public/password
pub async fn update_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PasswordUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(|e| ApiError::validation(&e))?;
    let reset_key = require_token(&req, FIND_PW_TOKEN)?;
    let ip = client_ip(&req);

    state
        .session
        .update_password_by_reset_token(&reset_key, &body.password, &ip)
        .await?;

    let mut response = HttpResponse::Ok().json(response::empty());
    TokenDelivery::new(ClientKind::of(&req))
        .clear(FIND_PW_TOKEN)
        .apply(&mut response);
    Ok(response)
}

/// POST /api/account/private/password/confirm
///
/// Re-checks the holder's password and hands back a short-lived confirm
/// token for the guarded operations that demand one.
pub async fn password_confirm_token(
    req: HttpRequest,
    state: web::Data<AppState>,
    ctx: SessionContext,
    body: web::Json<PasswordConfirmRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(|e| ApiError::validation(&e))?;
    let account_id = ctx.claims.account_id()?;
    let ip = client_ip(&req);

    let confirm_key = state
        .session
        .create_password_confirm_token(account_id, &body.password, &ip)
        .await?;

    let mut response = HttpResponse::Ok().json(response::empty());
    TokenDelivery::new(ClientKind::of(&req))
        .set(
            PASSWORD_CONFIRM_TOKEN,
            confirm_key.as_str(),
            intermediate_ttl(TokenPurpose::PasswordConfirmIntermediate),
        )
        .apply(&mut response);
    Ok(response)
}

/// DELETE /api/account/private
///
/// Needs a live confirm token on top of the session, then soft-deletes
/// behind the version guard.
pub async fn delete_account(
    req: HttpRequest,
    state: web::Data<AppState>,
    ctx: SessionContext,
    body: web::Json<DeleteAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    let confirm_key = require_token(&req, PASSWORD_CONFIRM_TOKEN)?;
    let account_id = ctx.claims.account_id()?;
    let ip = client_ip(&req);

    state
        .session
        .redeem_password_confirm_token(account_id, &confirm_key)
        .await?;
    state
        .session
        .delete_account(account_id, body.version, &ip)
        .await?;

    let mut response = HttpResponse::Ok().json(response::empty());
    TokenDelivery::new(ClientKind::of(&req))
        .clear(ACCESS_TOKEN)
        .clear(REFRESH_TOKEN)
        .clear(PASSWORD_CONFIRM_TOKEN)
        .apply(&mut response);
    Ok(response)
}
