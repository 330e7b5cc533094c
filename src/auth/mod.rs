// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! Token lifecycle core: credential checks, access-token issuance, and
//! rotating encrypted refresh tokens.
//!
//! The [`AuthFlowManager`] orchestrates everything; the other modules are
//! the narrow capabilities it composes (cipher, token issuer, password
//! hashing, store contract, clock).

pub mod cipher;
pub mod clock;
pub mod error;
pub mod manager;
pub mod password;
pub mod store;
pub mod token;

pub use cipher::{Cipher, CipherError};
pub use clock::{Clock, SystemClock};
pub use error::AuthError;
pub use manager::{AuthFlowManager, AuthSession, SessionCookie, ACCESS_COOKIE, REFRESH_COOKIE};
pub use store::{SessionStore, StoreError};
pub use token::{AccessClaims, TokenError, TokenIssuer};
