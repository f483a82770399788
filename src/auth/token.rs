// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification.
//!
//! Tokens use the compact three-part HS256 layout:
//!
//! ```text
//! base64url({"alg":"HS256","typ":"JWT"}) . base64url({"sub":..,"exp":..}) . base64url(hmac)
//! ```
//!
//! Refresh tokens additionally carry a random `jti` and `"token_use":"refresh"`,
//! so two refresh tokens are never equal and neither kind is accepted in
//! place of the other.
//!
//! The only way to read a subject out of a token is [`TokenService::validate`].
//! There is no accessor that decodes the payload without checking
//! the signature first.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::codec::{decode_segment, encode_segment};
use super::signer::Signer;

/// Default access token lifetime (1 hour).
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;

/// Default refresh token lifetime (14 days).
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 14 * 24 * 60 * 60;

/// `token_use` claim value carried by refresh tokens.
const REFRESH_TOKEN_USE: &str = "refresh";

/// Reasons a token is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Wrong segment count, undecodable base64, or unparsable payload
    #[error("token is malformed")]
    Malformed,
    /// Recomputed signature differs from the supplied one
    #[error("token signature does not match")]
    SignatureMismatch,
    /// `exp` is at or before the validation time
    #[error("token has expired")]
    Expired,
    /// Refresh token is valid but no longer bound to its member
    #[error("refresh token has been superseded")]
    StaleRefreshToken,
    /// Access token presented where a refresh token is required, or the
    /// reverse
    #[error("token is not usable here")]
    WrongTokenUse,
}

#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: Header = Header {
    alg: "HS256",
    typ: "JWT",
};

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_use: Option<String>,
}

impl Claims {
    fn is_refresh(&self) -> bool {
        self.token_use.as_deref() == Some(REFRESH_TOKEN_USE)
    }
}

/// Member identity taken from a verified token.
///
/// Has no public constructor: holding a `Subject` proves the token it came
/// from passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access/refresh credential pair returned by login and reissue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived bearer token for API requests
    pub access_token: String,
    /// Long-lived token accepted only by the reissue endpoint
    pub refresh_token: String,
}

/// Lifetimes applied at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
        }
    }
}

/// Issues and validates bearer tokens with the server secret.
#[derive(Debug, Clone)]
pub struct TokenService {
    signer: Signer,
    policy: TokenPolicy,
    encoded_header: String,
}

impl TokenService {
    pub fn new(signer: Signer, policy: TokenPolicy) -> Self {
        let header = serde_json::to_vec(&HEADER).unwrap_or_default();
        Self {
            signer,
            policy,
            encoded_header: encode_segment(&header),
        }
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Issue an access token for `subject` expiring `access_ttl_secs` after `now`.
    pub fn issue_access_token(&self, subject: &str, now: i64) -> String {
        self.issue(Claims {
            sub: subject.to_string(),
            exp: now.saturating_add(self.policy.access_ttl_secs),
            jti: None,
            token_use: None,
        })
    }

    /// Issue a refresh token for `subject` expiring `refresh_ttl_secs` after `now`.
    ///
    /// Every call yields a distinct token, even for the same subject and second.
    pub fn issue_refresh_token(&self, subject: &str, now: i64) -> String {
        self.issue(Claims {
            sub: subject.to_string(),
            exp: now.saturating_add(self.policy.refresh_ttl_secs),
            jti: Some(Uuid::new_v4().to_string()),
            token_use: Some(REFRESH_TOKEN_USE.to_string()),
        })
    }

    pub fn issue_pair(&self, subject: &str, now: i64) -> TokenPair {
        TokenPair {
            access_token: self.issue_access_token(subject, now),
            refresh_token: self.issue_refresh_token(subject, now),
        }
    }

    fn issue(&self, claims: Claims) -> String {
        // Serializing strings and an i64 cannot fail.
        let payload = serde_json::to_vec(&claims).unwrap_or_default();
        let message = format!("{}.{}", self.encoded_header, encode_segment(&payload));
        let signature = self.signer.sign(&message);
        format!("{message}.{signature}")
    }

    /// Verify `token` at time `now` and return its subject.
    ///
    /// Checks run in order: segment count, signature, payload, expiry. A
    /// token whose `exp` equals `now` is already expired.
    pub fn validate(&self, token: &str, now: i64) -> Result<Subject, TokenError> {
        self.verify(token, now).map(|claims| Subject(claims.sub))
    }

    /// [`TokenService::validate`], additionally refusing refresh tokens.
    pub fn validate_access(&self, token: &str, now: i64) -> Result<Subject, TokenError> {
        let claims = self.verify(token, now)?;
        if claims.is_refresh() {
            return Err(TokenError::WrongTokenUse);
        }
        Ok(Subject(claims.sub))
    }

    /// [`TokenService::validate`], additionally requiring a refresh token.
    pub fn validate_refresh(&self, token: &str, now: i64) -> Result<Subject, TokenError> {
        let claims = self.verify(token, now)?;
        if !claims.is_refresh() {
            return Err(TokenError::WrongTokenUse);
        }
        Ok(Subject(claims.sub))
    }

    fn verify(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        let message = &token[..header.len() + 1 + payload.len()];
        if !self.signer.verify(message, signature) {
            return Err(TokenError::SignatureMismatch);
        }

        let claims: Claims = serde_json::from_slice(&decode_segment(payload)?)
            .map_err(|_| TokenError::Malformed)?;

        if claims.exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Boolean form of [`TokenService::validate_access`] for callers that
    /// only need accept/reject. The rejection reason is logged at debug level.
    pub fn is_valid(&self, token: &str, now: i64) -> bool {
        match self.validate_access(token, now) {
            Ok(_) => true,
            Err(reason) => {
                tracing::debug!(%reason, "token rejected");
                false
            }
        }
    }
}
