// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

use std::sync::Arc;

use crate::auth::AuthFlowManager;
use crate::config::AuthConfig;
use crate::storage::AccountDatabase;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthFlowManager<Arc<AccountDatabase>>>,
}

impl AppState {
    pub fn new(config: &AuthConfig, store: Arc<AccountDatabase>) -> Self {
        Self {
            auth: Arc::new(AuthFlowManager::new(config, store)),
        }
    }
}
