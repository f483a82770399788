// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Routes the authentication gate lets through without looking at tokens.
//!
//! The default table mirrors the current board deployment. Treat it as
//! configuration under review: `/api/v1/s3/upload-image` is public today even
//! though uploads arguably should require a member.

use axum::http::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathMatch {
    /// Path must equal the pattern
    Exact(&'static str),
    /// Path equals the pattern or continues it with `/...`
    Prefix(&'static str),
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(pattern) => path == *pattern,
            PathMatch::Prefix(pattern) => match path.strip_prefix(pattern) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PublicRoute {
    method: Option<Method>,
    path: PathMatch,
}

/// Allow-list of unauthenticated routes.
#[derive(Debug, Clone, Default)]
pub struct PublicRoutes {
    routes: Vec<PublicRoute>,
}

impl PublicRoutes {
    /// An empty table: every route goes through token validation.
    pub fn none() -> Self {
        Self::default()
    }

    /// The board's current allow-list.
    pub fn board_defaults() -> Self {
        Self::none()
            .allow_exact("/api/v1/member/signup")
            .allow_exact("/api/v1/member/login")
            .allow_exact("/api/v1/member/kakao-accesstoken")
            .allow_exact("/api/v1/member/kakao-login")
            .allow_exact("/api/v1/member/reissue")
            .allow_exact("/api/v1/member/email-check")
            .allow_prefix("/health")
            .allow_prefix("/docs")
            .allow_prefix("/api-doc")
            .allow_prefix("/api/v1/category")
            // Unauthenticated uploads; needs review before it can be dropped.
            .allow_exact("/api/v1/s3/upload-image")
            .allow_exact_for(Method::GET, "/api/v1/article")
            .allow_exact_for(Method::GET, "/api/v1/article/list")
            .allow_exact_for(Method::GET, "/api/v1/comment")
    }

    /// Allow `path` exactly, for every method.
    pub fn allow_exact(self, path: &'static str) -> Self {
        self.push(None, PathMatch::Exact(path))
    }

    /// Allow `path` exactly, for `method` only.
    pub fn allow_exact_for(self, method: Method, path: &'static str) -> Self {
        self.push(Some(method), PathMatch::Exact(path))
    }

    /// Allow `path` and everything below it, for every method.
    pub fn allow_prefix(self, path: &'static str) -> Self {
        self.push(None, PathMatch::Prefix(path))
    }

    fn push(mut self, method: Option<Method>, path: PathMatch) -> Self {
        self.routes.push(PublicRoute { method, path });
        self
    }

    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        self.routes.iter().any(|route| {
            route.method.as_ref().is_none_or(|m| m == method) && route.path.matches(path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_signup_are_public_for_any_method() {
        let routes = PublicRoutes::board_defaults();
        assert!(routes.is_public(&Method::POST, "/api/v1/member/login"));
        assert!(routes.is_public(&Method::POST, "/api/v1/member/signup"));
        assert!(routes.is_public(&Method::POST, "/api/v1/member/reissue"));
    }

    #[test]
    fn article_reads_are_public_but_writes_are_not() {
        let routes = PublicRoutes::board_defaults();
        assert!(routes.is_public(&Method::GET, "/api/v1/article"));
        assert!(routes.is_public(&Method::GET, "/api/v1/article/list"));
        assert!(!routes.is_public(&Method::POST, "/api/v1/article"));
        assert!(!routes.is_public(&Method::DELETE, "/api/v1/comment"));
    }

    #[test]
    fn prefix_matches_whole_segments_only() {
        let routes = PublicRoutes::board_defaults();
        assert!(routes.is_public(&Method::GET, "/health"));
        assert!(routes.is_public(&Method::GET, "/health/live"));
        assert!(routes.is_public(&Method::GET, "/api/v1/category/search/sedan"));
        assert!(!routes.is_public(&Method::GET, "/healthz"));
        assert!(!routes.is_public(&Method::GET, "/api/v1/categoryx"));
    }

    #[test]
    fn member_profile_routes_are_protected() {
        let routes = PublicRoutes::board_defaults();
        assert!(!routes.is_public(&Method::GET, "/api/v1/member/user-info"));
        assert!(!routes.is_public(&Method::PUT, "/api/v1/member/nickname"));
        assert!(!routes.is_public(&Method::DELETE, "/api/v1/member/delete"));
        // exact entries do not leak to sub-paths
        assert!(!routes.is_public(&Method::POST, "/api/v1/member/login/extra"));
    }

    #[test]
    fn empty_table_protects_everything() {
        assert!(!PublicRoutes::none().is_public(&Method::GET, "/health"));
    }
}
