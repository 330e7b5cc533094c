// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! Keystone Auth - Credential & Session-Token Issuance Service
//!
//! Authenticates passwords, issues short-lived HS256 access tokens, and
//! maintains rotating, encrypted refresh tokens so clients can silently
//! re-establish sessions without re-entering credentials.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token lifecycle core (cipher, issuer, flows)
//! - `storage` - Embedded account database (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
