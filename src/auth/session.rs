// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential issuance bound to the member store, and refresh rotation.
//!
//! Every issuance overwrites the member's refresh binding, so a member has
//! at most one live refresh token. A superseded refresh token still passes
//! signature and expiry checks on its own; [`reissue`] rejects it because it
//! no longer matches the binding.

use super::token::{TokenError, TokenPair, TokenService};
use crate::models::Member;
use crate::store::{MemberStore, StoreResult};

/// Issue a fresh pair for `member` and bind its refresh token.
///
/// Used by password and social login.
pub fn start_session<S: MemberStore>(
    tokens: &TokenService,
    store: &mut S,
    member: &Member,
    now: i64,
) -> StoreResult<TokenPair> {
    let pair = tokens.issue_pair(&member.email, now);
    store.bind_refresh_token(&member.id, &pair.refresh_token)?;
    tracing::info!(member_id = %member.id, "session started");
    Ok(pair)
}

/// Exchange a bound refresh token for a new pair, rotating the binding.
///
/// The check and the rebind happen under the same `&mut` borrow of the
/// store, so callers holding a write guard get compare-and-swap semantics.
pub fn reissue<S: MemberStore>(
    tokens: &TokenService,
    store: &mut S,
    refresh_token: &str,
    now: i64,
) -> Result<TokenPair, TokenError> {
    let subject = tokens.validate_refresh(refresh_token, now)?;

    let Some(member) = store.find_by_subject(subject.as_str()) else {
        tracing::warn!(%subject, "refresh token for unknown member");
        return Err(TokenError::StaleRefreshToken);
    };

    let bound = store.current_refresh_token(&member.id);
    if bound.as_deref() != Some(refresh_token) {
        tracing::warn!(member_id = %member.id, "stale refresh token presented");
        return Err(TokenError::StaleRefreshToken);
    }

    let pair = tokens.issue_pair(subject.as_str(), now);
    store
        .bind_refresh_token(&member.id, &pair.refresh_token)
        .map_err(|_| TokenError::StaleRefreshToken)?;
    tracing::info!(member_id = %member.id, "refresh token rotated");
    Ok(pair)
}
