// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authentication_gate, TokenPair},
    models::{
        EmailCheckResponse, LoginRequest, MemberResponse, NicknameUpdateRequest,
        PasswordUpdateRequest, ReissueRequest, SignupRequest, SocialLoginRequest,
    },
    state::AppState,
};

pub mod health;
pub mod members;

pub fn router(state: AppState) -> Router {
    let member_routes = Router::new()
        .route("/signup", post(members::signup))
        .route("/login", post(members::login))
        .route("/kakao-login", post(members::kakao_login))
        .route("/reissue", post(members::reissue))
        .route("/email-check", get(members::email_check))
        .route("/user-info", get(members::user_info))
        .route("/nickname", put(members::update_nickname))
        .route("/password", put(members::update_password))
        .route("/delete", delete(members::delete_member));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/api/v1/member", member_routes)
        .with_state(state.clone())
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state, authentication_gate))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        members::signup,
        members::login,
        members::kakao_login,
        members::reissue,
        members::email_check,
        members::user_info,
        members::update_nickname,
        members::update_password,
        members::delete_member
    ),
    components(
        schemas(
            TokenPair,
            SignupRequest,
            LoginRequest,
            SocialLoginRequest,
            ReissueRequest,
            NicknameUpdateRequest,
            PasswordUpdateRequest,
            EmailCheckResponse,
            MemberResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and health probes"),
        (name = "Member", description = "Registration, login, and token rotation")
    )
)]
struct ApiDoc;
