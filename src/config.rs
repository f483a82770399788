// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup. A missing or
//! empty signing secret is fatal: the server refuses to start rather than
//! issue tokens signed with an empty key.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC-SHA256 signing secret | Required |
//! | `ACCESS_TOKEN_TTL_SECS` | Access token lifetime in seconds (at most 366 days) | `3600` |
//! | `REFRESH_TOKEN_TTL_SECS` | Refresh token lifetime in seconds (at most 366 days) | `1209600` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `KAKAO_USER_INFO_URL` | Kakao user-info endpoint for social login | `https://kapi.kakao.com/v2/user/me` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use thiserror::Error;

use crate::auth::token::{TokenPolicy, DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS};

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const ACCESS_TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECS";
pub const REFRESH_TOKEN_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const KAKAO_USER_INFO_URL_ENV: &str = "KAKAO_USER_INFO_URL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_KAKAO_USER_INFO_URL: &str = "https://kapi.kakao.com/v2/user/me";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Upper bound for either token lifetime (366 days).
pub const MAX_TTL_SECS: i64 = 366 * 24 * 60 * 60;

/// Startup configuration errors. All of them abort the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingSecret,
    #[error("signing secret must not be empty")]
    EmptySecret,
    #[error("signing secret rejected: {0}")]
    InvalidSecret(String),
    #[error("{name} must be between 1 and 31622400 seconds, got {value:?}")]
    InvalidTtl { name: &'static str, value: String },
    #[error("refresh token TTL ({refresh}s) must exceed access token TTL ({access}s)")]
    RefreshTtlTooShort { access: i64, refresh: i64 },
    #[error("PORT must be a valid port, got {0:?}")]
    InvalidPort(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Process-wide configuration.
#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub token_policy: TokenPolicy,
    pub host: String,
    pub port: u16,
    pub kakao_user_info_url: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::MissingSecret)?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let access_ttl_secs = parse_ttl(&lookup, ACCESS_TOKEN_TTL_ENV, DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_ttl_secs =
            parse_ttl(&lookup, REFRESH_TOKEN_TTL_ENV, DEFAULT_REFRESH_TTL_SECS)?;
        if refresh_ttl_secs <= access_ttl_secs {
            return Err(ConfigError::RefreshTtlTooShort {
                access: access_ttl_secs,
                refresh: refresh_ttl_secs,
            });
        }

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            jwt_secret,
            token_policy: TokenPolicy {
                access_ttl_secs,
                refresh_ttl_secs,
            },
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            kakao_user_info_url: lookup(KAKAO_USER_INFO_URL_ENV)
                .unwrap_or_else(|| DEFAULT_KAKAO_USER_INFO_URL.to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("token_policy", &self.token_policy)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("kakao_user_info_url", &self.kakao_user_info_url)
            .finish()
    }
}

fn parse_ttl<F>(lookup: &F, name: &'static str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(secs) if (1..=MAX_TTL_SECS).contains(&secs) => Ok(secs),
            _ => Err(ConfigError::InvalidTtl { name, value: raw }),
        },
    }
}
