// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! # API Data Models
//!
//! Request and response structures for the REST API plus the persisted
//! [`Account`] record. All API types derive `Serialize`, `Deserialize`, and
//! `ToSchema` for automatic JSON handling and OpenAPI documentation.
//!
//! The [`Account`] record is owned by the persistence layer; the auth core
//! holds a transient copy per request and never serializes it to a client
//! (it carries the password hash and the plaintext refresh secret).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// Account Record
// =============================================================================

/// A registered user account as persisted in the session store.
///
/// Invariants maintained by the auth core and the store:
/// - `email` is unique across all accounts
/// - `refresh_token`, when present, is unique across all accounts
/// - `refresh_token` and `refresh_token_expires_at` are both set or both
///   `None`, never mixed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Display name, embedded in access-token claims.
    pub username: String,
    /// Login identity; unique lookup key.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Argon2id password hash. Never leaves the server.
    pub password_hash: String,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
    /// Current plaintext refresh secret, if a session is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry of the current refresh secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Replace the refresh secret and its expiry together.
    pub fn set_refresh_token(&mut self, secret: String, expires_at: DateTime<Utc>) {
        self.refresh_token = Some(secret);
        self.refresh_token_expires_at = Some(expires_at);
    }

    /// Clear the refresh secret and its expiry together.
    pub fn clear_refresh_token(&mut self) {
        self.refresh_token = None;
        self.refresh_token_expires_at = None;
    }
}

// =============================================================================
// Request Models
// =============================================================================

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name for the new account.
    pub username: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Login email; must be unique.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
}

/// Request to authenticate with email and password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to end the session for an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutRequest {
    pub email: String,
}

// =============================================================================
// Response Models
// =============================================================================

/// Identity and access-token bundle returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    /// Signed access token (JWT). Also delivered as the `accessToken` cookie.
    pub token: String,
}

/// Generic outcome message for register and logout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_token_fields_move_together() {
        let mut account = Account {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            phone_number: "555".into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
            refresh_token: None,
            refresh_token_expires_at: None,
        };

        account.set_refresh_token("secret".into(), Utc::now());
        assert!(account.refresh_token.is_some());
        assert!(account.refresh_token_expires_at.is_some());

        account.clear_refresh_token();
        assert!(account.refresh_token.is_none());
        assert!(account.refresh_token_expires_at.is_none());
    }
}
