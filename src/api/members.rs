// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{
        password::{hash_password_blocking, verify_password_blocking},
        session,
        social::is_social_email,
        unix_now, Auth, AuthError, TokenPair,
    },
    error::ApiError,
    models::{
        EmailCheckQuery, EmailCheckResponse, LoginRequest, Member, MemberResponse,
        NicknameUpdateRequest, PasswordUpdateRequest, ReissueRequest, SignupRequest,
        SocialLoginRequest,
    },
    state::AppState,
    store::{MemberStore, NewMember, StoreError},
};

/// Register a member with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/member/signup",
    request_body = SignupRequest,
    tag = "Member",
    responses(
        (status = 201, description = "Member registered", body = MemberResponse),
        (status = 400, description = "Duplicate or reserved email, or password mismatch"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let email = request.email.trim().to_string();
    let nickname = request.nickname.trim().to_string();
    if email.is_empty() || nickname.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request(
            "Email, nickname and password are required",
        ));
    }
    if request.password != request.checked_password {
        return Err(ApiError::bad_request("Passwords do not match"));
    }
    if is_social_email(&email) {
        return Err(ApiError::bad_request(
            "Email domain is reserved for social login",
        ));
    }
    if state.store.read().await.email_exists(&email) {
        return Err(ApiError::bad_request("Email is already registered"));
    }

    let password_hash = hash_password_blocking(request.password)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let member = state.store.write().await.insert_member(NewMember {
        email,
        password_hash: Some(password_hash),
        nickname,
        profile_image: request.profile_image,
        ..NewMember::default()
    })?;

    tracing::info!(member_id = %member.id, "member registered");
    Ok((StatusCode::CREATED, Json(MemberResponse::from(&member))))
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/member/login",
    request_body = LoginRequest,
    tag = "Member",
    responses(
        (status = 200, description = "Credential pair", body = TokenPair),
        (status = 400, description = "Wrong password"),
        (status = 404, description = "Unknown email"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let member = state
        .store
        .read()
        .await
        .find_by_email(request.email.trim())
        .ok_or(AuthError::UnknownMember)?;

    let Some(stored_hash) = member.password_hash.clone() else {
        return Err(AuthError::InvalidCredentials);
    };
    if !verify_password_blocking(request.password, stored_hash).await {
        tracing::warn!(member_id = %member.id, "login with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let mut store = state.store.write().await;
    let pair = session::start_session(&state.tokens, &mut *store, &member, unix_now())
        .map_err(|_| AuthError::UnknownMember)?;
    Ok(Json(pair))
}

/// Log in with a Kakao access token, registering the member on first use.
#[utoipa::path(
    post,
    path = "/api/v1/member/kakao-login",
    request_body = SocialLoginRequest,
    tag = "Member",
    responses(
        (status = 200, description = "Credential pair", body = TokenPair),
        (status = 400, description = "Provider rejected the token"),
    )
)]
pub async fn kakao_login(
    State(state): State<AppState>,
    Json(request): Json<SocialLoginRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    if request.access_token.trim().is_empty() {
        return Err(AuthError::SocialLoginFailed(
            "access token is required".to_string(),
        ));
    }

    let profile = state.social.fetch_profile(&request.access_token).await?;

    let mut store = state.store.write().await;
    let member = match store.find_by_social_id(profile.provider, &profile.provider_id) {
        Some(member) => member,
        None => {
            let member = store
                .insert_member(NewMember {
                    email: profile.member_email(),
                    password_hash: None,
                    nickname: profile
                        .nickname
                        .clone()
                        .unwrap_or_else(|| profile.member_email()),
                    profile_image: profile.profile_image.clone(),
                    social_type: Some(profile.provider.to_string()),
                    social_id: Some(profile.provider_id.clone()),
                })
                .map_err(|e| match e {
                    StoreError::AlreadyExists(_) => AuthError::SocialLoginFailed(
                        "account email is already registered".to_string(),
                    ),
                    other => AuthError::InternalError(other.to_string()),
                })?;
            tracing::info!(member_id = %member.id, provider = profile.provider, "social member registered");
            member
        }
    };

    let pair = session::start_session(&state.tokens, &mut *store, &member, unix_now())
        .map_err(|e| AuthError::InternalError(e.to_string()))?;
    Ok(Json(pair))
}

/// Trade a refresh token for a new credential pair.
///
/// The presented refresh token must be the one currently bound to the
/// member; after success it is superseded by the returned one.
#[utoipa::path(
    post,
    path = "/api/v1/member/reissue",
    request_body = ReissueRequest,
    tag = "Member",
    responses(
        (status = 200, description = "New credential pair", body = TokenPair),
        (status = 401, description = "Refresh token invalid, expired, or superseded"),
    )
)]
pub async fn reissue(
    State(state): State<AppState>,
    Json(request): Json<ReissueRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let mut store = state.store.write().await;
    let pair = session::reissue(&state.tokens, &mut *store, &request.refresh_token, unix_now())
        .map_err(AuthError::from_refresh_failure)?;
    Ok(Json(pair))
}

/// Check whether an email is already registered.
#[utoipa::path(
    get,
    path = "/api/v1/member/email-check",
    params(EmailCheckQuery),
    tag = "Member",
    responses((status = 200, body = EmailCheckResponse))
)]
pub async fn email_check(
    State(state): State<AppState>,
    Query(params): Query<EmailCheckQuery>,
) -> Json<EmailCheckResponse> {
    let duplicate = state.store.read().await.email_exists(params.email.trim());
    Json(EmailCheckResponse { duplicate })
}

/// Get the authenticated member's profile.
#[utoipa::path(
    get,
    path = "/api/v1/member/user-info",
    tag = "Member",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Member profile", body = MemberResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Member no longer exists"),
    )
)]
pub async fn user_info(
    Auth(member): Auth,
    State(state): State<AppState>,
) -> Result<Json<MemberResponse>, ApiError> {
    let found = current_member(&state, member.subject()).await?;
    Ok(Json(MemberResponse::from(&found)))
}

/// Change the authenticated member's nickname.
#[utoipa::path(
    put,
    path = "/api/v1/member/nickname",
    request_body = NicknameUpdateRequest,
    tag = "Member",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Nickname updated"),
        (status = 400, description = "Blank nickname"),
        (status = 401, description = "Missing or invalid access token"),
    )
)]
pub async fn update_nickname(
    Auth(member): Auth,
    State(state): State<AppState>,
    Json(request): Json<NicknameUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    let nickname = request.nickname.trim();
    if nickname.is_empty() {
        return Err(ApiError::bad_request("Nickname must not be blank"));
    }

    let found = current_member(&state, member.subject()).await?;
    state
        .store
        .write()
        .await
        .update_nickname(&found.id, nickname)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change the authenticated member's password.
#[utoipa::path(
    put,
    path = "/api/v1/member/password",
    request_body = PasswordUpdateRequest,
    tag = "Member",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Password updated"),
        (status = 400, description = "Passwords do not match"),
        (status = 401, description = "Missing or invalid access token"),
    )
)]
pub async fn update_password(
    Auth(member): Auth,
    State(state): State<AppState>,
    Json(request): Json<PasswordUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    if request.password.is_empty() || request.password != request.confirm_password {
        return Err(ApiError::bad_request("Passwords do not match"));
    }

    let found = current_member(&state, member.subject()).await?;
    let password_hash = hash_password_blocking(request.password)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    state
        .store
        .write()
        .await
        .update_password_hash(&found.id, password_hash)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete the authenticated member.
#[utoipa::path(
    delete,
    path = "/api/v1/member/delete",
    tag = "Member",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 401, description = "Missing or invalid access token"),
    )
)]
pub async fn delete_member(
    Auth(member): Auth,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let found = current_member(&state, member.subject()).await?;
    state.store.write().await.delete_member(&found.id)?;
    tracing::info!(member_id = %found.id, "member deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn current_member(state: &AppState, subject: &str) -> Result<Member, ApiError> {
    state
        .store
        .read()
        .await
        .find_by_subject(subject)
        .ok_or_else(|| ApiError::not_found("Member not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedMember;
    use crate::state::test_support::VALID_SOCIAL_TOKEN;

    async fn register(state: &AppState, email: &str, password: &str) -> MemberResponse {
        let (status, Json(member)) = signup(
            State(state.clone()),
            Json(SignupRequest {
                email: email.to_string(),
                password: password.to_string(),
                checked_password: password.to_string(),
                nickname: "driver".to_string(),
                profile_image: None,
            }),
        )
        .await
        .expect("signup succeeds");
        assert_eq!(status, StatusCode::CREATED);
        member
    }

    fn auth_for(state: &AppState, subject: &str) -> Auth {
        let now = unix_now();
        let token = state.tokens.issue_access_token(subject, now);
        Auth(AuthenticatedMember::from(
            state.tokens.validate(&token, now).unwrap(),
        ))
    }

    #[tokio::test]
    async fn signup_rejects_mismatched_passwords() {
        let state = AppState::for_tests();
        let result = signup(
            State(state),
            Json(SignupRequest {
                email: "user@example.com".to_string(),
                password: "one".to_string(),
                checked_password: "two".to_string(),
                nickname: "driver".to_string(),
                profile_image: None,
            }),
        )
        .await;

        match result {
            Err(err) => assert_eq!(err.status, StatusCode::BAD_REQUEST),
            Ok(_) => panic!("expected mismatch to be rejected"),
        }
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let state = AppState::for_tests();
        register(&state, "user@example.com", "pw").await;

        let result = signup(
            State(state),
            Json(SignupRequest {
                email: " user@example.com ".to_string(),
                password: "pw".to_string(),
                checked_password: "pw".to_string(),
                nickname: "other".to_string(),
                profile_image: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(err) if err.status == StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn signup_rejects_social_domain() {
        let state = AppState::for_tests();
        let result = signup(
            State(state.clone()),
            Json(SignupRequest {
                email: "kakao_42@social.com".to_string(),
                password: "pw".to_string(),
                checked_password: "pw".to_string(),
                nickname: "squatter".to_string(),
                profile_image: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(err) if err.status == StatusCode::BAD_REQUEST));

        let Json(pair) = kakao_login(
            State(state),
            Json(SocialLoginRequest {
                access_token: VALID_SOCIAL_TOKEN.to_string(),
            }),
        )
        .await
        .expect("social login still registers the member");
        assert!(!pair.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn kakao_email_collision_is_a_client_error() {
        let state = AppState::for_tests();
        state
            .store
            .write()
            .await
            .insert_member(NewMember {
                email: "kakao_42@social.com".to_string(),
                nickname: "legacy".to_string(),
                ..NewMember::default()
            })
            .unwrap();

        let result = kakao_login(
            State(state),
            Json(SocialLoginRequest {
                access_token: VALID_SOCIAL_TOKEN.to_string(),
            }),
        )
        .await;
        match result {
            Err(err) => {
                assert!(matches!(err, AuthError::SocialLoginFailed(_)));
                assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            }
            Ok(_) => panic!("expected collision to be rejected"),
        }
    }

    #[tokio::test]
    async fn login_binds_refresh_token() {
        let state = AppState::for_tests();
        let member = register(&state, "user@example.com", "pw").await;

        let Json(pair) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "user@example.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await
        .expect("login succeeds");

        let bound = state.store.read().await.current_refresh_token(&member.id);
        assert_eq!(bound, Some(pair.refresh_token));
        assert_eq!(
            state
                .tokens
                .validate(&pair.access_token, unix_now())
                .unwrap()
                .as_str(),
            "user@example.com"
        );
    }

    #[tokio::test]
    async fn login_failures() {
        let state = AppState::for_tests();
        register(&state, "user@example.com", "pw").await;

        let wrong = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "user@example.com".to_string(),
                password: "nope".to_string(),
            }),
        )
        .await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

        let unknown = login(
            State(state),
            Json(LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await;
        assert!(matches!(unknown, Err(AuthError::UnknownMember)));
    }

    #[tokio::test]
    async fn kakao_login_registers_once_and_binds() {
        let state = AppState::for_tests();
        let request = || {
            Json(SocialLoginRequest {
                access_token: VALID_SOCIAL_TOKEN.to_string(),
            })
        };

        let Json(first) = kakao_login(State(state.clone()), request()).await.unwrap();
        let Json(second) = kakao_login(State(state.clone()), request()).await.unwrap();

        let store = state.store.read().await;
        let member = store.find_by_email("kakao_42@social.com").expect("registered");
        assert_eq!(member.social_type.as_deref(), Some("KAKAO"));
        assert_eq!(member.nickname, "kakao driver");
        assert_eq!(store.current_refresh_token(&member.id), Some(second.refresh_token));
        assert!(!first.access_token.is_empty());
    }

    #[tokio::test]
    async fn kakao_login_rejects_unknown_token() {
        let state = AppState::for_tests();
        let result = kakao_login(
            State(state),
            Json(SocialLoginRequest {
                access_token: "forged".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AuthError::SocialLoginFailed(_))));
    }

    #[tokio::test]
    async fn email_check_reports_duplicates() {
        let state = AppState::for_tests();
        register(&state, "user@example.com", "pw").await;

        let Json(taken) = email_check(
            State(state.clone()),
            Query(EmailCheckQuery {
                email: "user@example.com ".to_string(),
            }),
        )
        .await;
        assert!(taken.duplicate);

        let Json(free) = email_check(
            State(state),
            Query(EmailCheckQuery {
                email: "new@example.com".to_string(),
            }),
        )
        .await;
        assert!(!free.duplicate);
    }

    #[tokio::test]
    async fn profile_mutations_apply_to_authenticated_member() {
        let state = AppState::for_tests();
        register(&state, "user@example.com", "pw").await;

        let status = update_nickname(
            auth_for(&state, "user@example.com"),
            State(state.clone()),
            Json(NicknameUpdateRequest {
                nickname: "racer".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        update_password(
            auth_for(&state, "user@example.com"),
            State(state.clone()),
            Json(PasswordUpdateRequest {
                password: "new-pw".to_string(),
                confirm_password: "new-pw".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(info) = user_info(auth_for(&state, "user@example.com"), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(info.nickname, "racer");

        let relogin = login(
            State(state),
            Json(LoginRequest {
                email: "user@example.com".to_string(),
                password: "new-pw".to_string(),
            }),
        )
        .await;
        assert!(relogin.is_ok());
    }

    #[tokio::test]
    async fn blank_nickname_is_rejected() {
        let state = AppState::for_tests();
        register(&state, "user@example.com", "pw").await;

        let result = update_nickname(
            auth_for(&state, "user@example.com"),
            State(state),
            Json(NicknameUpdateRequest {
                nickname: "  ".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(err) if err.status == StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn deleted_member_cannot_reissue() {
        let state = AppState::for_tests();
        register(&state, "user@example.com", "pw").await;
        let Json(pair) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "user@example.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await
        .unwrap();

        let status = delete_member(auth_for(&state, "user@example.com"), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = reissue(
            State(state.clone()),
            Json(ReissueRequest {
                refresh_token: pair.refresh_token,
            }),
        )
        .await;
        assert!(matches!(result, Err(AuthError::StaleRefreshToken)));

        let gone = user_info(auth_for(&state, "user@example.com"), State(state)).await;
        assert!(matches!(gone, Err(err) if err.status == StatusCode::NOT_FOUND));
    }
}
