use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::token::TokenType;

pub type AuthResult<T> = Result<T, AuthError>;

/// Per-request authorization failures. Each maps to an HTTP response via
/// [`IntoResponse`]; none of these indicates a broken deployment.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    NoAuthorization(String),
    #[error("bad authorization header: {0}")]
    InvalidHeader(String),
    #[error("token has expired")]
    ExpiredToken,
    #[error("token signature verification failed")]
    InvalidSignature,
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("only {0} tokens are allowed for this endpoint")]
    WrongToken(TokenType),
    #[error("fresh token required")]
    FreshTokenRequired,
    #[error("{0}")]
    Csrf(&'static str),
    #[error("user claims verification failed")]
    ClaimsVerification,
    #[error("token has been revoked")]
    RevokedToken,
    #[error("user loader returned no user for subject '{0}'")]
    UserLoad(String),
}

impl AuthError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::NoAuthorization(_) => (StatusCode::UNAUTHORIZED, "missing_authorization"),
            AuthError::InvalidHeader(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_header"),
            AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "token_expired"),
            AuthError::InvalidSignature => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_signature"),
            AuthError::MalformedToken(_) => (StatusCode::UNPROCESSABLE_ENTITY, "malformed_token"),
            AuthError::WrongToken(_) => (StatusCode::UNPROCESSABLE_ENTITY, "wrong_token_type"),
            AuthError::FreshTokenRequired => (StatusCode::UNAUTHORIZED, "fresh_token_required"),
            AuthError::Csrf(_) => (StatusCode::UNAUTHORIZED, "csrf_failed"),
            AuthError::ClaimsVerification => (StatusCode::BAD_REQUEST, "claims_rejected"),
            AuthError::RevokedToken => (StatusCode::UNAUTHORIZED, "token_revoked"),
            AuthError::UserLoad(_) => (StatusCode::UNAUTHORIZED, "user_not_found"),
        }
    }
}

/// Fatal misconfiguration detected when building an [`crate::AuthGate`].
/// Surfaced at startup, never recoverable per request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("revocation checking is enabled but no RevocationCheck hook was registered")]
    MissingRevocationHook,
    #[error("no decoding key was provided")]
    MissingDecodingKey,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        let mut resp = (status, Json(body)).into_response();
        resp.headers_mut()
            .insert("X-Error-Code", HeaderValue::from_static(code));
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_code_header_and_status() {
        let resp = AuthError::ExpiredToken.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get("X-Error-Code").unwrap(),
            &HeaderValue::from_static("token_expired")
        );
    }

    #[test]
    fn structural_errors_are_unprocessable() {
        let resp = AuthError::WrongToken(TokenType::Access).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
