// ABOUTME: System-wide constants and configuration values for the Comanda API
// ABOUTME: Contains auth limits, header names, error messages, and environment defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Constants Module
//!
//! Application constants and environment-based configuration values.

use std::env;

/// Service identity constants
pub mod service_names {
    /// Server name used for logging and token issuer claims
    pub const COMANDA_SERVER: &str = "comanda-server";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Authentication and request limits
pub mod limits {
    /// Failed login attempts before a lockout window opens
    pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

    /// Minutes added to the lockout window per failure past the threshold
    pub const LOCKOUT_STEP_MINUTES: i64 = 5;

    /// Default session token lifetime for a normal login (seconds)
    pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

    /// Default session token lifetime when a login refreshes an
    /// existing session (seconds)
    pub const DEFAULT_SESSION_REFRESH_TTL_SECS: i64 = 8 * 3600;

    /// Default order token lifetime (seconds)
    pub const DEFAULT_ORDER_TOKEN_TTL_SECS: i64 = 10;

    /// Upper bound on the order token window (seconds); the order gate
    /// is an admission throttle and must stay short-lived
    pub const MAX_ORDER_TOKEN_TTL_SECS: i64 = 60;

    /// Maximum number of products that may be highlighted at once
    pub const MAX_HIGHLIGHTED_PRODUCTS: i64 = 5;

    /// Maximum accepted request body size in bytes
    pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

    /// Per-request handler timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// HTTP header names used by the gates
pub mod headers {
    /// Header carrying the ephemeral order token on public order submission
    pub const ORDER_KEY: &str = "x-order-key";

    /// Request correlation id header
    pub const REQUEST_ID: &str = "x-request-id";
}

/// Boundary error messages
///
/// Gate rejections are collapsed to generic messages at the HTTP boundary
/// so responses never reveal which internal check failed.
pub mod error_messages {
    /// Wrong name or wrong password, indistinguishable on purpose
    pub const INVALID_CREDENTIALS: &str = "Invalid account name or password";

    /// Authorization header absent on a protected route
    pub const NO_TOKEN_PROVIDED: &str = "No token provided";

    /// Session token failed signature, expiry, or type checks
    pub const INVALID_TOKEN: &str = "Invalid token";

    /// Session token is present in the revocation ledger
    pub const TOKEN_REVOKED: &str = "Token revoked";

    /// Order token absent on the public submission endpoint
    pub const MISSING_ORDER_TOKEN: &str = "Missing order token";

    /// Order token failed signature, expiry, or type checks
    pub const INVALID_ORDER_TOKEN: &str = "Invalid or expired token";

    /// Revocation ledger lookup itself failed
    pub const REVOCATION_CHECK_FAILED: &str = "Failed to validate token status";
}

/// Environment-based configuration defaults
pub mod env_config {
    use super::env;

    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 3000;

    /// Get HTTP server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HTTP_PORT)
    }

    /// Get database URL from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/comanda.db".into())
    }
}
