// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub use crate::auth::token::TokenPair;

/// Member record as held by the member store.
///
/// `email` doubles as the token subject. The refresh binding lives on the
/// member: at most one live refresh token, overwritten on every issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string; `None` for social members
    pub password_hash: Option<String>,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub social_type: Option<String>,
    pub social_id: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub checked_password: String,
    pub nickname: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of the social login call: the provider-issued access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLoginRequest {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReissueRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NicknameUpdateRequest {
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailCheckQuery {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailCheckResponse {
    pub duplicate: bool,
}

/// Public view of a member. Never includes the password hash or tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub email: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            email: member.email.clone(),
            nickname: member.nickname.clone(),
            profile_image: member.profile_image.clone(),
            social_type: member.social_type.clone(),
            created_at: member.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_response_omits_secrets() {
        let member = Member {
            id: "m-1".to_string(),
            email: "user@example.com".to_string(),
            password_hash: Some("$argon2id$hash".to_string()),
            nickname: "driver".to_string(),
            profile_image: None,
            social_type: None,
            social_id: None,
            refresh_token: Some("refresh".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(MemberResponse::from(&member)).unwrap();
        assert_eq!(json["email"], "user@example.com");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("refreshToken").is_none());
        assert!(json.get("profileImage").is_none());
    }

    #[test]
    fn token_pair_uses_camel_case() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"{"accessToken":"a","refreshToken":"r"}"#);
    }

    #[test]
    fn reissue_request_reads_camel_case() {
        let request: ReissueRequest =
            serde_json::from_str(r#"{"refreshToken":"abc"}"#).unwrap();
        assert_eq!(request.refresh_token, "abc");
    }
}
