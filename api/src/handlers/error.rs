//! Domain error to HTTP response mapping.
//!
//! Every failure leaves the api as an `ApiResponse` envelope with a stable
//! machine-readable code. Status and code are assigned here and nowhere
//! else; the domain never learns about HTTP.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::{debug, error};
use validator::ValidationErrors;

use sp_core::errors::{
    CredentialError, DomainError, RateLimitError, SignError, TokenError, VerificationError,
};
use sp_shared::ApiResponse;

/// Error carrying its final HTTP representation
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 401 with a guard-specific code
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    /// 400 from request body validation failures
    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let codes: Vec<&str> = errors.iter().map(|e| e.code.as_ref()).collect();
                format!("{}: {}", field, codes.join(", "))
            })
            .collect();
        fields.sort();
        Self::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            fields.join("; "),
        )
    }

    pub fn code(&self) -> &str {
        self.code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status)
            .json(ApiResponse::<()>::error(self.code, &self.message))
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let mapped = match &err {
            DomainError::Validation { message } => Self::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                message.clone(),
            ),
            DomainError::NotFound { resource } => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found"),
            ),
            DomainError::VersionConflict { .. } => Self::new(
                StatusCode::CONFLICT,
                "VERSION_CONFLICT",
                err.to_string(),
            ),
            DomainError::Internal { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE,
            ),

            DomainError::Token(token) => match token {
                TokenError::IllegalToken => {
                    Self::new(StatusCode::BAD_REQUEST, "TOKEN_ILLEGAL", token.to_string())
                }
                TokenError::NoSuchToken => {
                    Self::new(StatusCode::NOT_FOUND, "TOKEN_NOT_FOUND", token.to_string())
                }
                TokenError::ValueMismatch => Self::new(
                    StatusCode::UNAUTHORIZED,
                    "TOKEN_MISMATCH",
                    token.to_string(),
                ),
                TokenError::StoreReadFailed { .. } | TokenError::StoreWriteFailed { .. } => {
                    Self::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "TOKEN_STORE_ERROR",
                        INTERNAL_MESSAGE,
                    )
                }
            },

            DomainError::Credential(credential) => match credential {
                CredentialError::TimedOut => Self::new(
                    StatusCode::UNAUTHORIZED,
                    "CREDENTIAL_EXPIRED",
                    credential.to_string(),
                ),
                CredentialError::ValidationFailed | CredentialError::MissingClaim { .. } => {
                    Self::new(
                        StatusCode::UNAUTHORIZED,
                        "CREDENTIAL_INVALID",
                        "Credential validation failed",
                    )
                }
                CredentialError::BuildFailed => Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE,
                ),
            },

            DomainError::Cipher(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE,
            ),

            DomainError::Sign(sign) => match sign {
                SignError::MismatchCredentials { .. } => Self::new(
                    StatusCode::UNAUTHORIZED,
                    "SIGN_IN_FAILED",
                    "Email or password does not match",
                ),
                SignError::TooManyFailures { .. } => Self::new(
                    StatusCode::UNAUTHORIZED,
                    "SIGN_IN_LOCKED",
                    sign.to_string(),
                ),
                SignError::StatusStay => {
                    Self::new(StatusCode::FORBIDDEN, "ACCOUNT_STAY", sign.to_string())
                }
                SignError::StatusStop => {
                    Self::new(StatusCode::FORBIDDEN, "ACCOUNT_STOP", sign.to_string())
                }
                SignError::StatusDelete => {
                    Self::new(StatusCode::FORBIDDEN, "ACCOUNT_DELETED", sign.to_string())
                }
                SignError::AccountNotFound => {
                    Self::new(StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND", sign.to_string())
                }
            },

            DomainError::Verification(verification) => match verification {
                VerificationError::NoSuchVerification => Self::new(
                    StatusCode::NOT_FOUND,
                    "VERIFICATION_NOT_FOUND",
                    verification.to_string(),
                ),
                VerificationError::Expired => Self::new(
                    StatusCode::BAD_REQUEST,
                    "VERIFICATION_EXPIRED",
                    verification.to_string(),
                ),
                VerificationError::NotVerified => Self::new(
                    StatusCode::BAD_REQUEST,
                    "VERIFICATION_NOT_VERIFIED",
                    verification.to_string(),
                ),
            },

            DomainError::RateLimit(RateLimitError::TooManyRequests { .. }) => Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXCEEDED",
                "Too many requests, slow down",
            ),
        };

        if mapped.status.is_server_error() {
            error!(code = mapped.code, source = %err, "request failed");
        } else {
            debug!(code = mapped.code, source = %err, "request rejected");
        }
        mapped
    }
}
