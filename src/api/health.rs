// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status.
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Number of registered members.
    pub members: usize,
    /// Access token lifetime currently in force, in seconds.
    pub access_ttl_secs: i64,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint handler.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<ReadyResponse> {
    let members = state.store.read().await.len();

    Json(ReadyResponse {
        status: "ok".to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            members,
            access_ttl_secs: state.tokens.policy().access_ttl_secs,
        },
    })
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewMember;

    #[tokio::test]
    async fn health_reports_member_count_and_policy() {
        let state = AppState::for_tests();
        let Json(before) = health(State(state.clone())).await;
        assert_eq!(before.status, "ok");
        assert_eq!(before.checks.members, 0);

        state
            .store
            .write()
            .await
            .insert_member(NewMember {
                email: "user@example.com".to_string(),
                nickname: "driver".to_string(),
                ..NewMember::default()
            })
            .unwrap();

        let Json(after) = health(State(state.clone())).await;
        assert_eq!(after.checks.members, 1);
        assert_eq!(
            after.checks.access_ttl_secs,
            state.tokens.policy().access_ttl_secs
        );
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let Json(body) = liveness().await;
        assert_eq!(body.status, "ok");
    }
}
