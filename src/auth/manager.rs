// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! The auth flow state machine: register, login, logout, refresh.
//!
//! Each operation is a stateless transition driven entirely by store
//! contents; nothing is kept in-process between requests. The manager owns
//! the refresh-rotation protocol and decides the cookie lifecycle, emitting
//! [`SessionCookie`] artifacts for the transport layer to deliver.
//!
//! Rotation is single-use: every successful login or refresh supersedes the
//! stored refresh secret, so a captured old cookie replays at most once.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::config::AuthConfig;
use crate::models::{Account, AuthResponse, MessageResponse, RegisterRequest};

use super::cipher::Cipher;
use super::clock::{Clock, SystemClock};
use super::error::AuthError;
use super::password::{hash_password, verify_password};
use super::store::SessionStore;
use super::token::TokenIssuer;

/// Name of the access-token cookie.
pub const ACCESS_COOKIE: &str = "accessToken";

/// Name of the refresh-token cookie.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Lifetime of a refresh secret from the moment it is stored.
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

// =============================================================================
// Session Artifacts
// =============================================================================

/// A named, time-limited secure value for the transport layer to deliver.
///
/// All session cookies are HttpOnly + Secure + SameSite=None. The access
/// cookie carries no expiry (session-scoped); the refresh cookie expires
/// with the stored secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: &'static str,
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
    /// When true this artifact deletes the cookie instead of setting it.
    pub remove: bool,
}

impl SessionCookie {
    fn set(name: &'static str, value: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            name,
            value,
            expires_at,
            remove: false,
        }
    }

    fn removal(name: &'static str) -> Self {
        Self {
            name,
            value: String::new(),
            expires_at: None,
            remove: true,
        }
    }

    /// Render this artifact as a `Set-Cookie` header value.
    pub fn to_set_cookie_header(&self) -> String {
        if self.remove {
            return format!("{}=; Max-Age=0; HttpOnly; Secure; SameSite=None", self.name);
        }
        let mut header = format!(
            "{}={}; HttpOnly; Secure; SameSite=None",
            self.name, self.value
        );
        if let Some(expires_at) = self.expires_at {
            header.push_str("; Expires=");
            header.push_str(&expires_at.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        header
    }
}

/// Outcome of a successful login or refresh: the identity bundle for the
/// response body plus the cookies to set.
#[derive(Debug)]
pub struct AuthSession {
    pub response: AuthResponse,
    pub cookies: Vec<SessionCookie>,
}

// =============================================================================
// AuthFlowManager
// =============================================================================

/// Orchestrates the four auth operations over injected capabilities.
///
/// Generic over the [`SessionStore`] and the [`Clock`] so every flow is
/// testable against an in-memory store and a pinned time.
pub struct AuthFlowManager<S, C = SystemClock> {
    store: S,
    issuer: TokenIssuer,
    cipher: Cipher,
    clock: C,
}

impl<S: SessionStore> AuthFlowManager<S> {
    pub fn new(config: &AuthConfig, store: S) -> Self {
        Self::with_clock(config, store, SystemClock)
    }
}

impl<S: SessionStore, C: Clock> AuthFlowManager<S, C> {
    pub fn with_clock(config: &AuthConfig, store: S, clock: C) -> Self {
        Self {
            store,
            issuer: TokenIssuer::new(config),
            cipher: Cipher::new(&config.refresh_encryption_key),
            clock,
        }
    }

    /// Create a new account.
    ///
    /// Rejects duplicate emails; hashes the password before anything is
    /// persisted.
    pub fn register(&self, request: RegisterRequest) -> Result<MessageResponse, AuthError> {
        if self.store.find_by_email(&request.email)?.is_some() {
            warn!(email = %request.email, "registration rejected: email already in use");
            return Err(AuthError::EmailTaken);
        }

        let account = Account {
            id: uuid::Uuid::new_v4(),
            username: request.username,
            email: request.email,
            phone_number: request.phone_number,
            password_hash: hash_password(&request.password)?,
            created_at: self.clock.now(),
            refresh_token: None,
            refresh_token_expires_at: None,
        };
        self.store.upsert(&account)?;

        Ok(MessageResponse {
            message: "User registered successfully".to_string(),
        })
    }

    /// Authenticate with email and password and start a session.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller;
    /// the difference is only logged.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let Some(account) = self.store.find_by_email(email)? else {
            warn!("login attempt for unknown email");
            return Err(AuthError::AuthenticationFailed);
        };

        if !verify_password(&account.password_hash, password) {
            warn!(account_id = %account.id, "login attempt with incorrect password");
            return Err(AuthError::AuthenticationFailed);
        }

        self.rotate_session(account)
    }

    /// End the session for an account: clear its refresh secret and tell the
    /// transport layer to delete both cookies.
    ///
    /// Previously issued access tokens stay valid until their own expiry;
    /// only the refresh state is revoked.
    pub fn logout(&self, email: &str) -> Result<(MessageResponse, Vec<SessionCookie>), AuthError> {
        let Some(mut account) = self.store.find_by_email(email)? else {
            return Err(AuthError::AccountNotFound);
        };

        account.clear_refresh_token();
        self.store.upsert(&account)?;

        let cookies = vec![
            SessionCookie::removal(ACCESS_COOKIE),
            SessionCookie::removal(REFRESH_COOKIE),
        ];
        Ok((
            MessageResponse {
                message: "User logged out successfully".to_string(),
            },
            cookies,
        ))
    }

    /// Exchange an inbound encrypted refresh cookie for a new session.
    ///
    /// Every failure along the way (absent cookie, undecryptable value,
    /// no matching account, expired secret) collapses into the same
    /// authentication failure.
    pub fn refresh(&self, inbound: Option<&str>) -> Result<AuthSession, AuthError> {
        let encrypted = match inbound {
            Some(value) if !value.is_empty() => value,
            _ => return Err(AuthError::AuthenticationFailed),
        };

        let secret = match self.cipher.decrypt(encrypted) {
            Ok(plaintext) if !plaintext.is_empty() => plaintext,
            Ok(_) => return Err(AuthError::AuthenticationFailed),
            Err(err) => {
                warn!(%err, "inbound refresh token failed decryption");
                return Err(AuthError::AuthenticationFailed);
            }
        };

        let Some(account) = self.store.find_by_refresh_token(&secret)? else {
            warn!("refresh token does not match any account");
            return Err(AuthError::AuthenticationFailed);
        };

        // Reject secrets past their stored expiry instead of trusting the
        // value match alone.
        match account.refresh_token_expires_at {
            Some(expires_at) if expires_at > self.clock.now() => {}
            _ => {
                warn!(account_id = %account.id, "refresh token expired");
                return Err(AuthError::AuthenticationFailed);
            }
        }

        self.rotate_session(account)
    }

    /// Mint a new access token and refresh secret, persist the secret, and
    /// emit the outbound cookies. The previous refresh secret is superseded
    /// and permanently invalid.
    fn rotate_session(&self, mut account: Account) -> Result<AuthSession, AuthError> {
        let now = self.clock.now();
        let (access_token, _access_expires_at) = self.issuer.issue_access_token(&account, now)?;

        let secret = self.issuer.new_refresh_secret();
        let encrypted_secret = self.cipher.encrypt(&secret).map_err(|err| {
            warn!(%err, "failed to encrypt refresh secret");
            AuthError::AuthenticationFailed
        })?;

        let refresh_expires_at = now + Duration::days(REFRESH_TOKEN_TTL_DAYS);
        account.set_refresh_token(secret, refresh_expires_at);
        self.store.upsert(&account)?;

        let cookies = vec![
            SessionCookie::set(ACCESS_COOKIE, access_token.clone(), None),
            SessionCookie::set(REFRESH_COOKIE, encrypted_secret, Some(refresh_expires_at)),
        ];

        Ok(AuthSession {
            response: AuthResponse {
                username: account.username,
                email: account.email,
                phone_number: account.phone_number,
                token: access_token,
            },
            cookies,
        })
    }
}
