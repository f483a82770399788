// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors returned to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::token::TokenError;

/// Authentication error type.
///
/// Token-level failures never reach clients from the gate; these are the
/// outcomes a handler or the reissue endpoint reports.
#[derive(Debug)]
pub enum AuthError {
    /// Handler requires an identity and the gate attached none
    MissingIdentity,
    /// Login email is not registered
    UnknownMember,
    /// Login password does not match (or member has no password)
    InvalidCredentials,
    /// Refresh token is malformed or its signature does not match
    InvalidRefreshToken,
    /// Refresh token has expired
    ExpiredRefreshToken,
    /// Refresh token is no longer the one bound to its member
    StaleRefreshToken,
    /// Social provider rejected the token or returned an unusable profile
    SocialLoginFailed(String),
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Map a refresh-token validation failure to its client-facing error.
    pub fn from_refresh_failure(error: TokenError) -> Self {
        match error {
            TokenError::Expired => AuthError::ExpiredRefreshToken,
            TokenError::StaleRefreshToken => AuthError::StaleRefreshToken,
            TokenError::Malformed
            | TokenError::SignatureMismatch
            | TokenError::WrongTokenUse => AuthError::InvalidRefreshToken,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingIdentity => "authentication_required",
            AuthError::UnknownMember => "member_not_found",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::ExpiredRefreshToken => "expired_refresh_token",
            AuthError::StaleRefreshToken => "stale_refresh_token",
            AuthError::SocialLoginFailed(_) => "social_login_failed",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingIdentity
            | AuthError::InvalidRefreshToken
            | AuthError::ExpiredRefreshToken
            | AuthError::StaleRefreshToken => StatusCode::UNAUTHORIZED,
            AuthError::UnknownMember => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials | AuthError::SocialLoginFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingIdentity => write!(f, "Authentication is required"),
            AuthError::UnknownMember => write!(f, "Member not found"),
            AuthError::InvalidCredentials => write!(f, "Email or password does not match"),
            AuthError::InvalidRefreshToken
            | AuthError::ExpiredRefreshToken
            | AuthError::StaleRefreshToken => {
                write!(f, "Refresh token invalid, please log in again")
            }
            AuthError::SocialLoginFailed(msg) => write!(f, "Social login failed: {msg}"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
