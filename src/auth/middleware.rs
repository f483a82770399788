// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! Runs on every request before routing. The gate never rejects: it either
//! attaches an [`AuthenticatedMember`] to the request extensions or lets the
//! request through without one. Only access tokens attach an identity; a
//! refresh token in the `Authorization` header is ignored. Handlers that need a member use the
//! [`Auth`](super::Auth) extractor, which answers 401 when nothing was
//! attached.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         authentication_gate,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::{unix_now, AuthenticatedMember};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from `Authorization: Bearer <token>`.
///
/// A missing header, a non-ASCII value, a different scheme, or an empty token
/// all mean "no token"; none of them is an error on its own.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication gate middleware function.
pub async fn authentication_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Identity is only ever attached here, never taken from upstream.
    request.extensions_mut().remove::<AuthenticatedMember>();

    if state
        .public_routes
        .is_public(request.method(), request.uri().path())
    {
        return next.run(request).await;
    }

    let member = match bearer_token(request.headers()) {
        Some(token) => match state.tokens.validate_access(token, unix_now()) {
            Ok(subject) => Some(AuthenticatedMember::from(subject)),
            Err(reason) => {
                tracing::debug!(
                    %reason,
                    path = %request.uri().path(),
                    "bearer token rejected, continuing without identity"
                );
                None
            }
        },
        None => None,
    };

    if let Some(member) = member {
        request.extensions_mut().insert(member);
    }

    next.run(request).await
}
