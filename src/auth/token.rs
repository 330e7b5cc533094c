// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! Access-token signing and refresh-token material generation.
//!
//! Access tokens are HS256-signed JWTs carrying the minimal identity claims
//! {username, email}. They are stateless: never persisted and verified by
//! downstream services through signature and expiry alone.
//!
//! Refresh material is 64 bytes from the OS CSPRNG, base64-encoded. It is
//! never derived from user data; uniqueness at the store level is enforced
//! by the persistence layer, not by generation.

use base64ct::{Base64, Encoding};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::models::Account;

/// Entropy of a refresh secret in bytes.
const REFRESH_SECRET_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign access token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Claims embedded in an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Username of the authenticated account.
    pub sub: String,
    /// Email of the authenticated account.
    pub email: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

/// Issues signed access tokens and random refresh secrets.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    expiry_minutes: i64,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.signing_key.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expiry_minutes: config.access_token_expiry_minutes,
        }
    }

    /// Sign an access token for the account, expiring at `now + expiry_minutes`.
    ///
    /// Returns the encoded token and its expiry instant.
    pub fn issue_access_token(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let expires_at = now + Duration::minutes(self.expiry_minutes);
        let claims = AccessClaims {
            sub: account.username.clone(),
            email: account.email.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    /// Generate a fresh high-entropy refresh secret.
    pub fn new_refresh_secret(&self) -> String {
        let mut bytes = [0u8; REFRESH_SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        Base64::encode_string(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            signing_key: "unit-test-signing-key".into(),
            issuer: "keystone-auth".into(),
            audience: "keystone-clients".into(),
            access_token_expiry_minutes: 15,
            refresh_encryption_key: "unused-here".into(),
        }
    }

    fn test_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            phone_number: "555".into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
            refresh_token: None,
            refresh_token_expires_at: None,
        }
    }

    #[test]
    fn access_token_carries_identity_claims() {
        let config = test_config();
        let issuer = TokenIssuer::new(&config);
        let now = Utc::now();

        let (token, expires_at) = issuer.issue_access_token(&test_account(), now).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["keystone-auth"]);
        validation.set_audience(&["keystone-clients"]);

        let decoded = decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(config.signing_key.as_bytes()),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, "alice");
        assert_eq!(decoded.claims.email, "a@x.com");
        assert_eq!(decoded.claims.exp, expires_at.timestamp());
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 15 * 60);
    }

    #[test]
    fn wrong_signing_key_rejects_token() {
        let issuer = TokenIssuer::new(&test_config());
        let (token, _) = issuer.issue_access_token(&test_account(), Utc::now()).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["keystone-auth"]);
        validation.set_audience(&["keystone-clients"]);

        let result = decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(b"a-different-key"),
            &validation,
        );
        assert!(result.is_err());
    }

    #[test]
    fn refresh_secrets_are_long_and_distinct() {
        let issuer = TokenIssuer::new(&test_config());
        let a = issuer.new_refresh_secret();
        let b = issuer.new_refresh_secret();

        assert_ne!(a, b);
        // 64 bytes of entropy survive the base64 encoding
        let decoded = Base64::decode_vec(&a).unwrap();
        assert_eq!(decoded.len(), 64);
    }
}
