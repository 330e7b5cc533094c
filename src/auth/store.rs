// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! The persistence contract required by the auth core.
//!
//! The core treats persistence as a key-value store keyed by user identity.
//! Not-found is `Ok(None)`, a normal outcome distinct from a backend
//! [`StoreError`]. Each call must be atomic from the core's perspective;
//! the core issues no multi-step transactions beyond read-then-write
//! sequences on a single account.

use crate::models::Account;

/// Backend-agnostic storage failure.
///
/// Concrete backends (redb, in-memory) convert their own error types into
/// this one so the auth core never depends on a storage crate.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

/// Account lookup and persistence operations used by the auth flows.
pub trait SessionStore: Send + Sync {
    /// Find an account by its login email.
    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Find an account by its current plaintext refresh secret.
    fn find_by_refresh_token(&self, secret: &str) -> Result<Option<Account>, StoreError>;

    /// Insert or update an account, keeping all lookup indexes consistent.
    fn upsert(&self, account: &Account) -> Result<(), StoreError>;
}

impl<S: SessionStore> SessionStore for std::sync::Arc<S> {
    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_by_email(email)
    }

    fn find_by_refresh_token(&self, secret: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_by_refresh_token(secret)
    }

    fn upsert(&self, account: &Account) -> Result<(), StoreError> {
        (**self).upsert(account)
    }
}
