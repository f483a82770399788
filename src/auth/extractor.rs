// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the identity attached by the gate.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(member): Auth) -> impl IntoResponse {
//!     // member.subject() is the member email
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthenticatedMember};

/// Extractor for handlers that require a member.
///
/// Reads only the request extensions. It never looks at the `Authorization`
/// header itself, so a request the gate did not authenticate is rejected
/// with 401 no matter what it carries.
pub struct Auth(pub AuthenticatedMember);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedMember>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingIdentity)
    }
}

/// Optional authentication extractor.
///
/// Returns `None` when the gate attached no identity, instead of rejecting.
/// For public routes that show member-specific data when it is available.
pub struct OptionalAuth(pub Option<AuthenticatedMember>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(member)) => Ok(OptionalAuth(Some(member))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}
