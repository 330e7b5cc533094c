// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. Token and
//! encryption settings are mandatory: the service refuses to start without
//! them rather than issuing unverifiable credentials.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SIGNING_KEY` | Symmetric secret for HS256 access-token signatures | Required |
//! | `JWT_ISSUER` | `iss` claim stamped into access tokens | Required |
//! | `JWT_AUDIENCE` | `aud` claim stamped into access tokens | Required |
//! | `ACCESS_TOKEN_EXPIRY_MINUTES` | Access-token lifetime in minutes | Required |
//! | `REFRESH_ENCRYPTION_KEY` | Secret for encrypting refresh tokens in transit | Required |
//! | `DATA_DIR` | Directory holding the account database | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Environment variable name for the account database directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the logging format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Environment variable name for the access-token signing secret.
pub const JWT_SIGNING_KEY_ENV: &str = "JWT_SIGNING_KEY";

/// Environment variable name for the access-token issuer claim.
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";

/// Environment variable name for the access-token audience claim.
pub const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";

/// Environment variable name for the access-token lifetime in minutes.
pub const ACCESS_TOKEN_EXPIRY_MINUTES_ENV: &str = "ACCESS_TOKEN_EXPIRY_MINUTES";

/// Environment variable name for the refresh-token encryption secret.
pub const REFRESH_ENCRYPTION_KEY_ENV: &str = "REFRESH_ENCRYPTION_KEY";

/// Error raised when mandatory configuration is missing or malformed.
///
/// These are fatal: startup aborts instead of running with a partial
/// token configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {0} must not be empty")]
    Empty(&'static str),

    #[error("environment variable {0} is not a positive integer: {1}")]
    InvalidNumber(&'static str, String),
}

/// Token and encryption settings consumed by the auth core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret used to sign access tokens (HS256).
    pub signing_key: String,
    /// `iss` claim for issued access tokens.
    pub issuer: String,
    /// `aud` claim for issued access tokens.
    pub audience: String,
    /// Access-token lifetime in minutes.
    pub access_token_expiry_minutes: i64,
    /// Secret from which the refresh-token cipher key is derived.
    pub refresh_encryption_key: String,
}

impl AuthConfig {
    /// Load the auth configuration from the environment.
    ///
    /// Every field is mandatory; any missing or malformed value is a
    /// [`ConfigError`] and the caller is expected to abort startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_minutes = required(ACCESS_TOKEN_EXPIRY_MINUTES_ENV)?;
        Ok(Self {
            signing_key: required(JWT_SIGNING_KEY_ENV)?,
            issuer: required(JWT_ISSUER_ENV)?,
            audience: required(JWT_AUDIENCE_ENV)?,
            access_token_expiry_minutes: positive_minutes(
                ACCESS_TOKEN_EXPIRY_MINUTES_ENV,
                &raw_minutes,
            )?,
            refresh_encryption_key: required(REFRESH_ENCRYPTION_KEY_ENV)?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value)
}

fn positive_minutes(name: &'static str, raw: &str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(ConfigError::InvalidNumber(name, raw.to_string())),
    }
}
