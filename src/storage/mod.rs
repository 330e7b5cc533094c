// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! # Persistent Storage
//!
//! Account records live in an embedded redb database under `DATA_DIR`.
//! The auth core only sees the [`crate::auth::SessionStore`] trait; this
//! module provides its production implementation.

pub mod accounts;

pub use accounts::{AccountDatabase, AccountDbError, AccountDbResult};
