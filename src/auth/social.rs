// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Social identity providers.
//!
//! The board accepts a provider-issued access token, asks the provider who
//! it belongs to, and then treats the result like any other member login.
//! The OAuth authorization-code exchange itself happens on the client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::AuthError;
use crate::config::ConfigError;

pub const KAKAO: &str = "KAKAO";

/// Domain of the synthetic emails given to social members. Password signup
/// may not use it.
pub const SOCIAL_EMAIL_DOMAIN: &str = "social.com";

/// Whether `email` belongs to the synthetic social-member domain.
pub fn is_social_email(email: &str) -> bool {
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.eq_ignore_ascii_case(SOCIAL_EMAIL_DOMAIN))
}

/// Profile returned by a social provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialProfile {
    /// Provider name stored on the member (e.g. `KAKAO`)
    pub provider: &'static str,
    /// Provider-side stable user id
    pub provider_id: String,
    pub nickname: Option<String>,
    pub profile_image: Option<String>,
}

impl SocialProfile {
    /// Synthetic email used as the token subject for social members.
    pub fn member_email(&self) -> String {
        format!(
            "{}_{}@{SOCIAL_EMAIL_DOMAIN}",
            self.provider.to_lowercase(),
            self.provider_id
        )
    }
}

#[async_trait]
pub trait SocialIdentityProvider: Send + Sync {
    /// Resolve a provider access token into a profile.
    async fn fetch_profile(&self, access_token: &str) -> Result<SocialProfile, AuthError>;
}

#[derive(Debug, Deserialize)]
struct KakaoUserInfo {
    id: i64,
    #[serde(default)]
    kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Deserialize)]
struct KakaoAccount {
    #[serde(default)]
    profile: Option<KakaoProfile>,
}

#[derive(Debug, Deserialize)]
struct KakaoProfile {
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    profile_image_url: Option<String>,
}

impl From<KakaoUserInfo> for SocialProfile {
    fn from(info: KakaoUserInfo) -> Self {
        let profile = info.kakao_account.and_then(|account| account.profile);
        let (nickname, profile_image) = match profile {
            Some(p) => (p.nickname, p.profile_image_url),
            None => (None, None),
        };
        Self {
            provider: KAKAO,
            provider_id: info.id.to_string(),
            nickname,
            profile_image,
        }
    }
}

/// Kakao user-info client.
#[derive(Clone)]
pub struct KakaoProvider {
    user_info_url: String,
    client: reqwest::Client,
}

impl KakaoProvider {
    pub fn new(user_info_url: impl Into<String>) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            user_info_url: user_info_url.into(),
            client,
        })
    }
}

#[async_trait]
impl SocialIdentityProvider for KakaoProvider {
    async fn fetch_profile(&self, access_token: &str) -> Result<SocialProfile, AuthError> {
        let response = self
            .client
            .get(&self.user_info_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::SocialLoginFailed(format!("user info request: {e}")))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "kakao rejected access token");
            return Err(AuthError::SocialLoginFailed(format!(
                "HTTP {} from user info endpoint",
                response.status()
            )));
        }

        let info: KakaoUserInfo = response
            .json()
            .await
            .map_err(|e| AuthError::SocialLoginFailed(format!("user info body: {e}")))?;

        Ok(info.into())
    }
}
