// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! Auth endpoints: register, login, logout, refresh.
//!
//! Handlers are thin request/response mapping around
//! [`crate::auth::AuthFlowManager`]; the cookie artifacts it emits are
//! rendered here into `Set-Cookie` headers.

use axum::{
    extract::State,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    auth::{AuthError, SessionCookie, REFRESH_COOKIE},
    error::ApiError,
    models::{AuthResponse, LoginRequest, LogoutRequest, MessageResponse, RegisterRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.auth.register(request)?;
    Ok(Json(message))
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated; session cookies set", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let session = state
        .auth
        .login(&request.email, &request.password)
        .map_err(|err| match err {
            AuthError::AuthenticationFailed => ApiError::unauthorized("Invalid credentials"),
            other => other.into(),
        })?;
    with_cookies(Json(session.response), &session.cookies)
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    request_body = LogoutRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session ended; cookies deleted", body = MessageResponse),
        (status = 400, description = "No account with this email"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<Response, ApiError> {
    let (message, cookies) = state.auth.logout(&request.email)?;
    with_cookies(Json(message), &cookies)
}

#[utoipa::path(
    post,
    path = "/v1/auth/refresh-token",
    tag = "Auth",
    responses(
        (status = 200, description = "Session rotated; fresh cookies set", body = AuthResponse),
        (status = 401, description = "Invalid refresh token"),
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let inbound = cookie_value(&headers, REFRESH_COOKIE);
    let session = state
        .auth
        .refresh(inbound.as_deref())
        .map_err(|err| match err {
            AuthError::AuthenticationFailed => ApiError::unauthorized("Invalid refresh token"),
            other => other.into(),
        })?;
    with_cookies(Json(session.response), &session.cookies)
}

/// Attach session cookies to a JSON response.
fn with_cookies<T: IntoResponse>(
    body: T,
    cookies: &[SessionCookie],
) -> Result<Response, ApiError> {
    let mut response = body.into_response();
    for cookie in cookies {
        let value = HeaderValue::from_str(&cookie.to_set_cookie_header())
            .map_err(|_| ApiError::internal("Something went wrong!"))?;
        response.headers_mut().append(SET_COOKIE, value);
    }
    Ok(response)
}

/// Read a named cookie out of the request's `Cookie` headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((key, value)) = pair.trim().split_once('=') {
                if key == name {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::storage::AccountDatabase;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let db = AccountDatabase::open(&dir.path().join("accounts.redb")).expect("open db");
        let config = AuthConfig {
            signing_key: "handler-test-signing-key".into(),
            issuer: "keystone-auth".into(),
            audience: "keystone-clients".into(),
            access_token_expiry_minutes: 15,
            refresh_encryption_key: "handler-test-refresh-key".into(),
        };
        (AppState::new(&config, Arc::new(db)), dir)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".into(),
            password: "p1".into(),
            email: "a@x.com".into(),
            phone_number: "555".into(),
        }
    }

    #[tokio::test]
    async fn register_success_and_duplicate() {
        let (state, _dir) = test_state();

        let Json(message) = register(State(state.clone()), Json(register_request()))
            .await
            .expect("register succeeds");
        assert_eq!(message.message, "User registered successfully");

        let err = register(State(state), Json(register_request()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "User already registered with this email");
    }

    #[tokio::test]
    async fn login_sets_both_cookies() {
        let (state, _dir) = test_state();
        register(State(state.clone()), Json(register_request()))
            .await
            .unwrap();

        let response = login(
            State(state),
            Json(LoginRequest {
                email: "a@x.com".into(),
                password: "p1".into(),
            }),
        )
        .await
        .expect("login succeeds");

        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
    }

    #[tokio::test]
    async fn login_bad_password_is_401() {
        let (state, _dir) = test_state();
        register(State(state.clone()), Json(register_request()))
            .await
            .unwrap();

        let err = login(
            State(state),
            Json(LoginRequest {
                email: "a@x.com".into(),
                password: "wrong".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn refresh_without_cookie_is_401() {
        let (state, _dir) = test_state();
        let err = refresh_token(State(state), HeaderMap::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid refresh token");
    }

    #[test]
    fn cookie_value_parses_multi_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; refreshToken=abc123; lang=en"),
        );
        assert_eq!(
            cookie_value(&headers, "refreshToken").as_deref(),
            Some("abc123")
        );
        assert_eq!(cookie_value(&headers, "accessToken"), None);
    }
}
