//! Session endpoints: sign-in, sign-out, refresh and the channel
//! verification variants.

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::warn;
use validator::Validate;

use sp_core::domain::entities::verification::VerificationChannel;
use sp_shared::types::response;
use sp_shared::ApiResponse;

use crate::client::{
    client_ip, read_token, ClientKind, TokenDelivery, ACCESS_TOKEN, AUTH_TOKEN, REFRESH_TOKEN,
    VERIFICATION_EMAIL_TOKEN, VERIFICATION_PHONE_TOKEN,
};
use crate::dto::{SessionExpiryResponse, SignInRequest};
use crate::handlers::ApiError;
use crate::middleware::SessionContext;
use crate::state::AppState;

use super::require_token;

/// POST /api/session/public/in
pub async fn sign_in(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SignInRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(|e| ApiError::validation(&e))?;

    let ip = client_ip(&req);
    let tokens = state.session.sign_in(&body.email, &body.password, &ip).await?;

    let mut response =
        HttpResponse::Ok().json(ApiResponse::success(SessionExpiryResponse::from(&tokens)));
    TokenDelivery::new(ClientKind::of(&req))
        .set(ACCESS_TOKEN, tokens.access_token.as_str(), tokens.access_expires_in)
        .set(
            REFRESH_TOKEN,
            tokens.refresh_token.as_str(),
            tokens.refresh_expires_in,
        )
        .apply(&mut response);
    Ok(response)
}

/// POST /api/session/private/out
///
/// Always answers success; revocation problems are logged, never
/// surfaced to the signing-out client.
pub async fn sign_out(
    req: HttpRequest,
    state: web::Data<AppState>,
    ctx: SessionContext,
) -> HttpResponse {
    let ip = client_ip(&req);
    match ctx.claims.account_id() {
        Ok(account_id) => {
            state
                .session
                .sign_out(account_id, &ctx.access_token, &ctx.refresh_token, &ip)
                .await;
        }
        Err(e) => warn!(error = %e, "sign-out with unreadable subject"),
    }

    let mut response = HttpResponse::Ok().json(response::empty());
    TokenDelivery::new(ClientKind::of(&req))
        .clear(ACCESS_TOKEN)
        .clear(REFRESH_TOKEN)
        .apply(&mut response);
    response
}

/// POST /api/session/public/refresh
pub async fn refresh(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let refresh_token = require_token(&req, REFRESH_TOKEN)?;
    let ip = client_ip(&req);
    let tokens = state.session.refresh(&refresh_token, &ip).await?;

    let mut response =
        HttpResponse::Ok().json(ApiResponse::success(SessionExpiryResponse::from(&tokens)));
    TokenDelivery::new(ClientKind::of(&req))
        .set(ACCESS_TOKEN, tokens.access_token.as_str(), tokens.access_expires_in)
        .set(
            REFRESH_TOKEN,
            tokens.refresh_token.as_str(),
            tokens.refresh_expires_in,
        )
        .apply(&mut response);
    Ok(response)
}

/// POST /api/session/public/in/auth/phone
pub async fn sign_in_by_phone(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    sign_in_by_channel(req, state, VerificationChannel::Phone, VERIFICATION_PHONE_TOKEN).await
}

/// POST /api/session/public/in/auth/email
pub async fn sign_in_by_email(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    sign_in_by_channel(req, state, VerificationChannel::Email, VERIFICATION_EMAIL_TOKEN).await
}

/// Exchanges a channel verification token for a verification credential
async fn sign_in_by_channel(
    req: HttpRequest,
    state: web::Data<AppState>,
    channel: VerificationChannel,
    token_name: &'static str,
) -> Result<HttpResponse, ApiError> {
    let key = require_token(&req, token_name)?;
    let ip = client_ip(&req);
    let auth_token = state
        .session
        .sign_in_by_verification(channel, &key, &ip)
        .await?;

    let expires_in = state.credential.verification_token_expiry;
    let mut response = HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "expires_in": expires_in,
    })));
    TokenDelivery::new(ClientKind::of(&req))
        .set(AUTH_TOKEN, auth_token.as_str(), expires_in)
        .clear(token_name)
        .apply(&mut response);
    Ok(response)
}

/// POST /api/session/private/out/auth
///
/// The holder carries a verification credential, not a session pair, so
/// this endpoint sits outside the session guard and checks its own
/// token. Like every sign-out it always answers success.
pub async fn sign_out_auth(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let ip = client_ip(&req);
    if let Some(token) = read_token(&req, AUTH_TOKEN) {
        if let Err(e) = state.session.sign_out_by_verification(&token, &ip).await {
            warn!(error = %e, "verification sign-out failed");
        }
    }

    let mut response = HttpResponse::Ok().json(response::empty());
    TokenDelivery::new(ClientKind::of(&req))
        .clear(AUTH_TOKEN)
        .apply(&mut response);
    response
}
