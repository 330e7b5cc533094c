// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! Auth flow errors.
//!
//! This is the external taxonomy: every internal failure (bad password,
//! unknown email, undecryptable refresh cookie, missing store entry) is
//! collapsed into it at the manager boundary, with detail logged server-side
//! only. Authentication failures are a single signal so callers cannot
//! distinguish "email not registered" from "wrong password".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::store::StoreError;
use super::token::TokenError;
use crate::auth::password::PasswordHashError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Register with an email that already has an account.
    #[error("User already registered with this email")]
    EmailTaken,

    /// Logout for an email with no account.
    #[error("User not found with this email")]
    AccountNotFound,

    /// Bad credentials or a bad/expired/absent refresh token.
    /// One variant on purpose, see module docs.
    #[error("invalid credentials")]
    AuthenticationFailed,

    /// Signing configuration problem discovered while minting a token.
    #[error(transparent)]
    TokenGeneration(#[from] TokenError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// HTTP status for this error at the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken | AuthError::AccountNotFound => StatusCode::BAD_REQUEST,
            AuthError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AuthError::TokenGeneration(_)
            | AuthError::Storage(_)
            | AuthError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Server-side faults are flattened to a generic message; the detail
    /// lives only in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::EmailTaken | AuthError::AccountNotFound => self.to_string(),
            AuthError::AuthenticationFailed => "Invalid credentials".to_string(),
            AuthError::TokenGeneration(_)
            | AuthError::Storage(_)
            | AuthError::PasswordHash(_) => "Something went wrong!".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
