// ABOUTME: Shared server state handed to every route handler
// ABOUTME: Bundles the database pool, token service, and notifier behind one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::auth::TokenService;
use crate::database::Database;
use crate::notifications::OrderNotifier;
use std::sync::Arc;

/// Shared resources for HTTP handlers
///
/// Cloning is cheap; the struct is placed behind one `Arc` in router state.
pub struct ServerResources {
    /// Database connection pool and storage managers
    pub database: Database,
    /// Token issuance and verification
    pub tokens: TokenService,
    /// Outbound order notification channel
    pub notifier: Arc<dyn OrderNotifier>,
}

impl ServerResources {
    /// Bundle the server's shared services
    #[must_use]
    pub fn new(database: Database, tokens: TokenService, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self {
            database,
            tokens,
            notifier,
        }
    }
}
