// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the board API.
//!
//! ## Auth Flow
//!
//! 1. Member logs in (email/password or Kakao) and receives an access and a
//!    refresh token; the refresh token is bound to the member
//! 2. Client sends `Authorization: Bearer <access token>`
//! 3. The gate middleware:
//!    - Skips allow-listed routes entirely
//!    - Verifies HMAC-SHA256 signature and expiry
//!    - Attaches the `sub` claim as the request's member identity
//! 4. When the access token expires, the client trades the refresh token at
//!    `/api/v1/member/reissue` for a new pair; the old refresh token stops
//!    working
//!
//! ## Security
//!
//! - The gate is fail-open; handlers are fail-closed (`Auth` extractor → 401)
//! - A subject can only be obtained from a token that passed validation
//! - The signing secret is injected at startup; an empty secret aborts boot

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod public_routes;
pub mod session;
pub mod signer;
pub mod social;
pub mod token;

pub use claims::AuthenticatedMember;
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use middleware::authentication_gate;
pub use public_routes::PublicRoutes;
pub use social::{KakaoProvider, SocialIdentityProvider, SocialProfile};
pub use token::{Subject, TokenError, TokenPair, TokenPolicy, TokenService};

/// Current Unix time in seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
